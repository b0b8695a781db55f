//! Error types for the optimizer crate.

use std::time::Duration;

/// Errors raised by a score optimizer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptimizerError {
    /// The matrix is empty, has more rows than columns, or its dimensions do
    /// not match the declared sizes.
    #[error("invalid assignment shape: {rows} rows x {cols} columns")]
    ShapeMismatch { rows: usize, cols: usize },

    /// The exact search exceeded its wall-clock budget.
    #[error("assignment search exceeded its budget of {budget:?}")]
    Timeout { budget: Duration },
}

/// Convenience alias for optimizer results.
pub type OptimizerResult<T> = Result<T, OptimizerError>;
