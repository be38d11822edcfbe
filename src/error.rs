//! Error types for lineup optimization.

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::data::export::ExportError;
pub use crate::data::import::ImportError;
pub use crate::optimizer::solver::SolverError;

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    /// The request cannot be run under the configured contest rules.
    #[error("invalid request: {}", format_field_errors(.0))]
    InvalidRequest(Vec<FieldError>),

    /// The solver broke its contract. Never retried.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| format!("{}: {}", err.field, err.message))
        .collect::<Vec<_>>()
        .join("; ")
}
