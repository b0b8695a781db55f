//! Diff engine for shapediff.
//!
//! Walks a [`Model`] over two instances and produces a [`Diff`] tree shaped
//! like the model, carrying a [`Status`] and a similarity score for every
//! node.
//!
//! # Key Types
//!
//! - [`Diff`] / [`DiffKind`] -- The result tree and its navigation helpers
//! - [`DiffEngine`] -- Recursive comparison with fuzzy list alignment and
//!   assignment-based set reconciliation
//! - [`DiffConfig`] -- Threshold and optimizer selection
//!
//! [`Model`]: shapediff_model::Model
//! [`Status`]: shapediff_types::Status

pub mod config;
pub mod engine;
pub mod error;
pub mod tree;

pub use config::DiffConfig;
pub use engine::DiffEngine;
pub use error::{DiffError, DiffResult};
pub use tree::{Diff, DiffKind, DiffSummary};
