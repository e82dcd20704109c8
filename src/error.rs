use thiserror::Error;

/// Errors returned by a single optimization run.
///
/// Validation errors are raised before any model is built. Solver statuses
/// are surfaced as-is and never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArbitrageError {
    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),

    #[error("Time series is empty")]
    EmptySeries,

    #[error("Invalid time series at row {row}: {reason}")]
    InvalidSeries { row: usize, reason: String },

    #[error("LP model is infeasible")]
    Infeasible,

    #[error("LP model is unbounded")]
    Unbounded,

    #[error("LP solver did not produce a solution: {0}")]
    NotSolved(String),

    #[error("Solver reported optimal but returned no value for variable {variable}")]
    MissingVariableValue { variable: String },
}

pub type Result<T, E = ArbitrageError> = std::result::Result<T, E>;
