//! k-combinations of a slice, yielded in lexicographic index order.

/// Iterator over every `k`-element subset of `items`, preserving input order inside each
/// subset. `k > items.len()` yields nothing; `k == 0` yields a single empty subset.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    items: &'a [T],
    indices: Vec<usize>,
    done: bool,
}

impl<'a, T> Combinations<'a, T> {
    pub fn new(items: &'a [T], k: usize) -> Self {
        Self {
            items,
            indices: (0..k).collect(),
            done: k > items.len(),
        }
    }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.iter().map(|&i| &self.items[i]).collect();

        // Advance: find the rightmost index that can still move right.
        let n = self.items.len();
        let k = self.indices.len();
        let mut pivot = None;
        for slot in (0..k).rev() {
            if self.indices[slot] < n - k + slot {
                pivot = Some(slot);
                break;
            }
        }
        match pivot {
            Some(slot) => {
                self.indices[slot] += 1;
                for next in slot + 1..k {
                    self.indices[next] = self.indices[next - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}

pub fn combinations<T>(items: &[T], k: usize) -> Combinations<'_, T> {
    Combinations::new(items, k)
}

/// Number of `k`-subsets of `n` items.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}
