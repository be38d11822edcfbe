//! Exclusion-driven diversification.
//!
//! Exact top-K enumeration of a 0/1 program is out of reach, so distinct lineups are found by
//! resampling: remove `min_uniqueness` players of a reference lineup, re-solve, and walk to
//! the new optimum. Locked players are never removed.
//!
//! The walk is inherently sequential (each exclusion set depends on the previous result).
//! Only the optional exploratory batch, which perturbs the baseline lineup, runs in parallel.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::OptimizerConfig;
use crate::data::player::PlayerRecord;
use crate::optimizer::combinations::{binomial, combinations};
use crate::optimizer::lineup::{LineupEntry, LineupResult};
use crate::optimizer::model::build_model;
use crate::optimizer::pool::prepare;
use crate::optimizer::solver::{LineupSolver, SolveOutcome, SolverError};
use crate::optimizer::LineupRequest;
use crate::parallel::{batch_ranges, WorkerPool};

/// Progress-reporting chunks for the exploratory batch.
const EXPLORATORY_PROGRESS_BATCHES: usize = 8;

pub struct Diversifier<'a, S: ?Sized> {
    players: &'a [PlayerRecord],
    request: &'a LineupRequest,
    config: &'a OptimizerConfig,
    solver: &'a S,
    rng: StdRng,
}

impl<'a, S> Diversifier<'a, S>
where
    S: LineupSolver + ?Sized,
{
    pub fn new(
        players: &'a [PlayerRecord],
        request: &'a LineupRequest,
        config: &'a OptimizerConfig,
        solver: &'a S,
    ) -> Self {
        let rng = match request.seed.or(config.search.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            players,
            request,
            config,
            solver,
            rng,
        }
    }

    /// Total solves allowed after the baseline.
    pub fn attempt_budget(&self) -> usize {
        if self.request.number_of_lineups <= 1 {
            return 0;
        }
        self.request
            .number_of_lineups
            .saturating_mul(self.config.search.attempts_per_lineup)
    }

    /// Solve once with `exclusions` removed on top of the request's removed players.
    pub fn solve_excluding(&self, exclusions: &[String]) -> Result<Option<LineupResult>, SolverError> {
        let mut excluded: HashSet<String> = self.request.removed_player_ids.iter().cloned().collect();
        excluded.extend(exclusions.iter().cloned());

        let slots = prepare(self.players, &excluded, self.request.require_expected_players);
        let model = build_model(&slots, &self.request.locked_player_ids, &self.config.rules);

        match self.solver.solve(&model)? {
            SolveOutcome::Optimal(assignment) => {
                let entries: Vec<LineupEntry> = assignment
                    .selected_indices()
                    .map(|index| LineupEntry::from(&slots[index]))
                    .collect();
                Ok(Some(LineupResult::new(entries, assignment.objective)))
            }
            SolveOutcome::Infeasible => Ok(None),
        }
    }

    /// Every `min_uniqueness`-subset of the reference lineup's unlocked players.
    pub fn exclusion_subsets(&self, reference: &LineupResult) -> Vec<Vec<String>> {
        let free: Vec<&str> = reference
            .player_ids()
            .into_iter()
            .filter(|id| !self.request.locked_player_ids.contains(*id))
            .collect();
        let k = self.request.min_uniqueness;
        let mut subsets = Vec::with_capacity(binomial(free.len(), k));
        subsets.extend(
            combinations(&free, k).map(|subset| subset.into_iter().map(|id| id.to_string()).collect()),
        );
        subsets
    }

    /// Run the baseline solve, the optional exploratory batch and the random walk.
    /// Returns every feasible lineup found, baseline first, in discovery order.
    pub fn collect_candidates<F>(
        mut self,
        cancel: Option<&AtomicBool>,
        mut on_progress: F,
    ) -> Result<Vec<LineupResult>, SolverError>
    where
        F: FnMut(usize, usize),
    {
        let Some(baseline) = self.solve_excluding(&[])? else {
            warn!(
                event = "baseline_infeasible",
                players = self.players.len(),
                locked = self.request.locked_player_ids.len(),
                removed = self.request.removed_player_ids.len(),
                "no feasible lineup for this pool"
            );
            return Ok(Vec::new());
        };
        info!(
            event = "baseline_solved",
            score = baseline.score,
            salary = baseline.total_salary()
        );

        let budget = self.attempt_budget();
        let mut attempts = 0usize;
        let mut candidates = vec![baseline.clone()];
        on_progress(attempts, budget);

        let batch_size = self.config.search.exploratory_batch.min(budget);
        if batch_size > 0 && !is_cancelled(cancel) {
            let subsets = self
                .exclusion_subsets(&baseline)
                .into_iter()
                .choose_multiple(&mut self.rng, batch_size);
            let found = self.explore(&subsets, budget, &mut attempts, &mut on_progress)?;
            debug!(
                event = "exploratory_batch_done",
                solved = subsets.len(),
                feasible = found.len()
            );
            candidates.extend(found);
        }

        let mut reference = baseline;
        while attempts < budget {
            if is_cancelled(cancel) {
                info!(event = "search_cancelled", attempts, budget);
                break;
            }
            attempts += 1;

            let Some(exclusion) = self
                .exclusion_subsets(&reference)
                .into_iter()
                .choose(&mut self.rng)
            else {
                debug!(
                    event = "no_exclusion_subset",
                    attempt = attempts,
                    min_uniqueness = self.request.min_uniqueness
                );
                on_progress(attempts, budget);
                continue;
            };

            match self.solve_excluding(&exclusion)? {
                Some(lineup) => {
                    debug!(
                        event = "attempt_feasible",
                        attempt = attempts,
                        score = lineup.score,
                        changed = lineup.difference(&reference),
                        excluded = ?exclusion
                    );
                    reference = lineup.clone();
                    candidates.push(lineup);
                }
                None => debug!(event = "attempt_infeasible", attempt = attempts, excluded = ?exclusion),
            }
            on_progress(attempts, budget);
        }

        info!(
            event = "search_done",
            attempts,
            budget,
            candidates = candidates.len()
        );
        Ok(candidates)
    }

    /// Solve the exploratory exclusion sets in parallel, chunk by chunk so progress can be
    /// reported. Results keep the order of `subsets`.
    fn explore<F>(
        &self,
        subsets: &[Vec<String>],
        budget: usize,
        attempts: &mut usize,
        on_progress: &mut F,
    ) -> Result<Vec<LineupResult>, SolverError>
    where
        F: FnMut(usize, usize),
    {
        let thread_pool = WorkerPool::with_workers(self.config.search.workers).thread_pool();
        let mut found = Vec::new();
        for (start, end) in batch_ranges(subsets.len(), EXPLORATORY_PROGRESS_BATCHES) {
            let chunk = &subsets[start..end];
            let solve_chunk = || {
                chunk
                    .par_iter()
                    .map(|exclusion| self.solve_excluding(exclusion))
                    .collect::<Result<Vec<_>, _>>()
            };
            let solved: Vec<Option<LineupResult>> = match &thread_pool {
                Some(pool) => pool.install(solve_chunk),
                None => solve_chunk(),
            }?;
            found.extend(solved.into_iter().flatten());
            *attempts += chunk.len();
            on_progress(*attempts, budget);
        }
        Ok(found)
    }
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}
