//! Error types for the diff crate.

use shapediff_model::ModelError;
use shapediff_optimizer::OptimizerError;
use shapediff_types::TypeError;

/// Errors that can occur while computing or navigating a diff.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiffError {
    /// The matching threshold lies outside `(0, 1]`.
    #[error("threshold must lie in (0, 1], got {0}")]
    InvalidThreshold(f64),

    /// A map or set instance repeats a key or element.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A path step does not match the diff node kind it addresses, or tries
    /// to descend past a simple diff.
    #[error("cannot navigate {step} into a {node} diff")]
    UnsupportedNavigation { step: String, node: &'static str },

    /// A path step addresses a child that does not exist.
    #[error("no child at {step}")]
    NotFound { step: String },

    /// Assignment failed while reconciling a set.
    #[error("optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    /// Model construction or navigation failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// An instance does not have the shape its model describes.
    #[error("type error: {0}")]
    Type(#[from] TypeError),

    /// Configuration could not be parsed or is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
