use thiserror::Error;

/// Errors produced when an instance does not have the shape a model expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Convenience alias for type-level results.
pub type TypeResult<T> = Result<T, TypeError>;
