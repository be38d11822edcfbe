use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::config::OptimizerConfig;
use crate::data::export::{lineups_to_csv, ExportError};
use crate::data::import::{parse_player_pool_csv, ImportError};
use crate::data::player::PlayerRecord;
use crate::data::validate::validate_player_pool;
use crate::error::{FieldError, OptimizeError};
use crate::optimizer::lineup::LineupResult;
use crate::optimizer::solver::{LineupSolver, SolverError};
use crate::optimizer::{optimize_lineups, LineupRequest};

#[derive(Debug, Clone, Serialize)]
pub struct PlayersResponse<'a> {
    pub status: &'static str,
    pub count: usize,
    pub players: &'a [PlayerRecord],
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolReplacedResponse {
    pub status: &'static str,
    pub count: usize,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    pub status: &'static str,
    pub requested: usize,
    pub count: usize,
    pub duration_ms: u64,
    pub lineups: Vec<LineupResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl From<Vec<FieldError>> for ValidationErrorResponse {
    fn from(errors: Vec<FieldError>) -> Self {
        let mut by_field: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for err in errors {
            by_field.entry(err.field).or_default().push(err.message);
        }
        Self {
            status: "error",
            message: "Validation failed",
            errors: by_field
                .into_iter()
                .map(|(field, messages)| ValidationIssue { field, messages })
                .collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid optimize request")]
    Validation(ValidationErrorResponse),
    #[error("Invalid player list: {0}")]
    Import(#[from] ImportError),
    #[error("solver failure: {0}")]
    Solver(#[from] SolverError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<OptimizeError> for ApiError {
    fn from(err: OptimizeError) -> Self {
        match err {
            OptimizeError::InvalidRequest(errors) => Self::Validation(errors.into()),
            OptimizeError::Solver(err) => Self::Solver(err),
        }
    }
}

pub fn health_payload() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "service": "lineup-optimizer-api",
        "version": env!("CARGO_PKG_VERSION")
    })
}

pub fn players_payload(players: &[PlayerRecord]) -> PlayersResponse<'_> {
    PlayersResponse {
        status: "ok",
        count: players.len(),
        players,
    }
}

/// Parse a replacement player list and report its diagnostics. The caller swaps the pool.
pub fn parse_players_body(
    body: &str,
    config: &OptimizerConfig,
) -> Result<(Vec<PlayerRecord>, PoolReplacedResponse), ApiError> {
    let players = parse_player_pool_csv(body.as_bytes())?;
    let report = validate_player_pool(&players, &config.rules);
    let response = PoolReplacedResponse {
        status: "ok",
        count: players.len(),
        diagnostics: report.diagnostics.iter().map(ToString::to_string).collect(),
    };
    Ok((players, response))
}

pub fn parse_optimize_request(body: &str) -> Result<LineupRequest, ApiError> {
    if body.trim().is_empty() {
        return Ok(LineupRequest::default());
    }
    Ok(serde_json::from_str(body)?)
}

pub fn optimize_payload(
    players: &[PlayerRecord],
    config: &OptimizerConfig,
    solver: &dyn LineupSolver,
    body: &str,
) -> Result<OptimizeResponse, ApiError> {
    let request = parse_optimize_request(body)?;
    let started = Instant::now();
    let lineups = optimize_lineups(players, &request, config, solver)?;
    Ok(OptimizeResponse {
        status: "ok",
        requested: request.number_of_lineups,
        count: lineups.len(),
        duration_ms: started.elapsed().as_millis() as u64,
        lineups,
    })
}

pub fn export_payload(
    players: &[PlayerRecord],
    config: &OptimizerConfig,
    solver: &dyn LineupSolver,
    body: &str,
) -> Result<String, ApiError> {
    let request = parse_optimize_request(body)?;
    let lineups = optimize_lineups(players, &request, config, solver)?;
    Ok(lineups_to_csv(&lineups)?)
}
