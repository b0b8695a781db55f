//! Model-driven structural diff.
//!
//! Describe the shape of your data with a [`Model`], then hand two instances
//! to a [`Differ`]. The result is a [`Diff`] tree shaped like the model where
//! every node carries a [`Status`] and a similarity score in `[0, 1]`.
//! Elements of lists and sets are matched fuzzily: two elements count as the
//! same item when the score of their own diff reaches the configured
//! threshold.
//!
//! This is the main entry point for applications; the member crates can be
//! used directly for finer control (e.g. a custom [`ScoreOptimizer`]).

pub mod differ;

pub use differ::Differ;

// Re-export key types
pub use shapediff_diff::{Diff, DiffConfig, DiffEngine, DiffError, DiffKind, DiffResult, DiffSummary};
pub use shapediff_model::{BeanModel, Comparator, ContentHasher, Model, ModelError, ModelResult, Property};
pub use shapediff_optimizer::{
    ExactOptimizer, GreedyOptimizer, OptimizerError, OptimizerKind, OptimizerResult, ScoreOptimizer,
};
pub use shapediff_types::{Path, PathElement, Status, TypeError, TypeResult, Value};
