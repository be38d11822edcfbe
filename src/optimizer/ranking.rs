use std::collections::HashSet;

use crate::optimizer::lineup::LineupResult;

/// Collapse lineups with identical player sets (first occurrence wins), sort by score
/// descending and keep at most `limit`.
pub fn rank_lineups(candidates: Vec<LineupResult>, limit: usize) -> Vec<LineupResult> {
    rank_diverse_lineups(candidates, limit, 1)
}

/// Like [rank_lineups], additionally skipping any lineup that shares more than
/// `roster - min_uniqueness` players with a lineup already kept. Walking candidates in score
/// order keeps the best lineup first.
pub fn rank_diverse_lineups(
    candidates: Vec<LineupResult>,
    limit: usize,
    min_uniqueness: usize,
) -> Vec<LineupResult> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<LineupResult> = candidates
        .into_iter()
        .filter(|lineup| seen.insert(lineup.canonical_key()))
        .collect();

    ranked.sort_by(|left, right| right.score.total_cmp(&left.score));

    let mut kept: Vec<LineupResult> = Vec::with_capacity(limit.min(ranked.len()));
    for lineup in ranked {
        if kept.len() >= limit {
            break;
        }
        if kept
            .iter()
            .all(|accepted| lineup.difference(accepted) >= min_uniqueness)
        {
            kept.push(lineup);
        }
    }
    kept
}
