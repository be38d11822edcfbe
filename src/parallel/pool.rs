//! Rayon thread pool configuration for the exploratory solve batch.
//!
//! Use [WorkerPool::install] to run parallel solves with a fixed number of threads, or rely
//! on Rayon's default (all CPU cores). Callers that install repeatedly should build once with
//! [WorkerPool::thread_pool].

use rayon::{ThreadPool, ThreadPoolBuilder};

/// Configures how many worker threads are used for parallel batch execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure on a thread pool with this worker count. If [workers](WorkerPool::workers)
    /// is 0, or a dedicated pool cannot be built, uses the global Rayon pool.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match self.thread_pool() {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Build a dedicated pool with this worker count. `None` means "use the global pool":
    /// either [workers](WorkerPool::workers) is 0 or the build failed.
    pub fn thread_pool(&self) -> Option<ThreadPool> {
        if self.workers == 0 {
            return None;
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => Some(pool),
            Err(err) => {
                tracing::warn!(workers = self.workers, error = %err, "falling back to global rayon pool");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn bounded_pool_limits_threads() {
        let threads = WorkerPool::with_workers(2).install(rayon::current_num_threads);
        assert_eq!(threads, 2);
    }

    #[test]
    fn default_workers_use_global_pool() {
        assert!(WorkerPool::default().thread_pool().is_none());
    }

    #[test]
    fn built_pool_serves_repeated_installs() {
        let pool = WorkerPool::with_workers(2)
            .thread_pool()
            .expect("two-thread pool builds");
        for _ in 0..4 {
            assert_eq!(pool.install(rayon::current_num_threads), 2);
        }
    }

    #[test]
    fn results_keep_input_order() {
        let doubled: Vec<u32> = WorkerPool::with_workers(3)
            .install(|| (0..64u32).into_par_iter().map(|v| v * 2).collect());
        assert_eq!(doubled, (0..64u32).map(|v| v * 2).collect::<Vec<_>>());
    }
}
