//! Error types for the model crate.

use shapediff_types::TypeError;

/// Errors raised while building or navigating a model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two properties of a bean share a name.
    #[error("duplicate property {name:?} in bean {bean}")]
    DuplicateKey { bean: String, name: String },

    /// A path step does not match the node kind it addresses, or tries to
    /// descend past a leaf value.
    #[error("cannot navigate {step} into a {node} node")]
    UnsupportedNavigation { step: String, node: &'static str },

    /// A property step names a property the bean does not declare.
    #[error("bean {bean} has no property {name:?}")]
    UnknownProperty { bean: String, name: String },

    /// A terminal index step lies beyond the end of the sequence.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// An instance does not have the shape the model describes.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Convenience alias for model results.
pub type ModelResult<T> = Result<T, ModelError>;
