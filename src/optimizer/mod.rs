pub mod combinations;
pub mod diversify;
pub mod lineup;
pub mod model;
pub mod pool;
pub mod ranking;
pub mod solver;

use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{ContestRules, OptimizerConfig};
use crate::data::player::PlayerRecord;
use crate::error::{FieldError, OptimizeError};
use crate::optimizer::diversify::Diversifier;
use crate::optimizer::lineup::LineupResult;
use crate::optimizer::ranking::rank_diverse_lineups;
use crate::optimizer::solver::LineupSolver;

/// Largest minimum-uniqueness a request may ask for, before the roster-size cap.
pub const MAX_MIN_UNIQUENESS: usize = 7;

/// Caller-supplied parameters of one optimization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineupRequest {
    pub number_of_lineups: usize,
    pub locked_player_ids: BTreeSet<String>,
    pub removed_player_ids: BTreeSet<String>,
    /// Players any two returned lineups must differ by.
    pub min_uniqueness: usize,
    /// Only players flagged as expected to play are eligible.
    pub require_expected_players: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LineupRequest {
    fn default() -> Self {
        Self {
            number_of_lineups: 1,
            locked_player_ids: BTreeSet::new(),
            removed_player_ids: BTreeSet::new(),
            min_uniqueness: 1,
            require_expected_players: false,
            seed: None,
        }
    }
}

impl LineupRequest {
    /// Check the request against the contest it will run under. Every failing field is reported.
    pub fn validate(&self, rules: &ContestRules) -> Result<(), OptimizeError> {
        let mut errors = Vec::new();
        if self.number_of_lineups == 0 {
            errors.push(FieldError {
                field: "number_of_lineups",
                message: "must be at least 1".to_string(),
            });
        }
        let max_uniqueness = MAX_MIN_UNIQUENESS.min(rules.roster_size as usize);
        if !(1..=max_uniqueness).contains(&self.min_uniqueness) {
            errors.push(FieldError {
                field: "min_uniqueness",
                message: format!("must be between 1 and {max_uniqueness}"),
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(OptimizeError::InvalidRequest(errors))
        }
    }
}

/// Up to `request.number_of_lineups` distinct lineups, best first. An infeasible pool yields an
/// empty list, not an error.
pub fn optimize_lineups<S>(
    players: &[PlayerRecord],
    request: &LineupRequest,
    config: &OptimizerConfig,
    solver: &S,
) -> Result<Vec<LineupResult>, OptimizeError>
where
    S: LineupSolver + ?Sized,
{
    optimize_lineups_with_progress(players, request, config, solver, None, |_, _| {})
}

/// Like [optimize_lineups] but stops early once `cancel` is set and invokes
/// `on_progress(attempts_done, attempt_budget)` after every solve attempt.
pub fn optimize_lineups_with_progress<S, F>(
    players: &[PlayerRecord],
    request: &LineupRequest,
    config: &OptimizerConfig,
    solver: &S,
    cancel: Option<&AtomicBool>,
    on_progress: F,
) -> Result<Vec<LineupResult>, OptimizeError>
where
    S: LineupSolver + ?Sized,
    F: FnMut(usize, usize),
{
    request.validate(&config.rules)?;
    info!(
        event = "optimize_started",
        players = players.len(),
        lineups = request.number_of_lineups,
        min_uniqueness = request.min_uniqueness,
        locked = request.locked_player_ids.len(),
        removed = request.removed_player_ids.len()
    );

    let candidates = Diversifier::new(players, request, config, solver)
        .collect_candidates(cancel, on_progress)
        .map_err(|err| {
            error!(event = "solver_failed", error = %err);
            OptimizeError::Solver(err)
        })?;

    let found = candidates.len();
    let ranked = rank_diverse_lineups(candidates, request.number_of_lineups, request.min_uniqueness);
    info!(
        event = "optimize_done",
        candidates = found,
        returned = ranked.len(),
        best = ranked.first().map(|lineup| lineup.score)
    );
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::player::Position;
    use crate::optimizer::solver::MicroLpSolver;

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn request_defaults_from_empty_json() {
        let request: LineupRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, LineupRequest::default());
        assert_eq!(request.number_of_lineups, 1);
        assert_eq!(request.min_uniqueness, 1);
    }

    #[test]
    fn request_parses_snake_case_fields() {
        let request: LineupRequest = serde_json::from_str(
            r#"{"number_of_lineups": 5, "locked_player_ids": ["a"], "min_uniqueness": 3,
                "require_expected_players": true, "seed": 9}"#,
        )
        .unwrap();
        assert_eq!(request.number_of_lineups, 5);
        assert_eq!(request.locked_player_ids, ids(&["a"]));
        assert!(request.removed_player_ids.is_empty());
        assert_eq!(request.min_uniqueness, 3);
        assert!(request.require_expected_players);
        assert_eq!(request.seed, Some(9));
    }

    #[test]
    fn validate_collects_every_field_error() {
        let request = LineupRequest {
            number_of_lineups: 0,
            min_uniqueness: 8,
            ..LineupRequest::default()
        };
        match request.validate(&ContestRules::default()) {
            Err(OptimizeError::InvalidRequest(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["number_of_lineups", "min_uniqueness"]);
            }
            other => panic!("expected invalid request, got {other:?}"),
        }
    }

    #[test]
    fn min_uniqueness_capped_by_roster_size() {
        let rules = ContestRules {
            roster_size: 3,
            position_minimums: Default::default(),
            ..ContestRules::default()
        };
        let request = LineupRequest {
            min_uniqueness: 4,
            ..LineupRequest::default()
        };
        assert!(request.validate(&rules).is_err());
        let request = LineupRequest {
            min_uniqueness: 3,
            ..LineupRequest::default()
        };
        assert!(request.validate(&rules).is_ok());
    }

    #[test]
    fn lock_on_removed_player_is_infeasible_not_an_error() {
        let players = vec![
            PlayerRecord::new("a", "A", vec![Position::Center], 1000).with_projection(1.0),
            PlayerRecord::new("b", "B", vec![Position::Center], 1000).with_projection(2.0),
        ];
        let mut config = OptimizerConfig::default();
        config.rules.roster_size = 1;
        config.rules.position_minimums = Default::default();
        let request = LineupRequest {
            locked_player_ids: ids(&["a"]),
            removed_player_ids: ids(&["a"]),
            ..LineupRequest::default()
        };
        let lineups = optimize_lineups(&players, &request, &config, &MicroLpSolver).unwrap();
        assert!(lineups.is_empty());
    }

    #[test]
    fn empty_pool_returns_no_lineups() {
        let lineups = optimize_lineups(
            &[],
            &LineupRequest::default(),
            &OptimizerConfig::default(),
            &MicroLpSolver,
        )
        .unwrap();
        assert!(lineups.is_empty());
    }

    #[test]
    fn invalid_request_never_reaches_solver() {
        let players = vec![PlayerRecord::new("a", "A", vec![Position::Center], 1000).with_projection(1.0)];
        let request = LineupRequest {
            number_of_lineups: 0,
            ..LineupRequest::default()
        };
        let err = optimize_lineups(&players, &request, &OptimizerConfig::default(), &MicroLpSolver)
            .unwrap_err();
        assert!(err.to_string().contains("number_of_lineups"));
    }
}
