//! Foundation types for shapediff.
//!
//! This crate provides the instance, addressing, and status types shared by
//! every other shapediff crate.
//!
//! # Key Types
//!
//! - [`Value`] -- Dynamic instance value compared by a model
//! - [`Path`] / [`PathElement`] -- Typed address into a model or diff tree
//! - [`Status`] -- Per-node change classification and its combine algebra

pub mod error;
pub mod path;
pub mod status;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use path::{Path, PathElement};
pub use status::Status;
pub use value::Value;
