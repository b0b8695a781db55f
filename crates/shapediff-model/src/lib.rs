//! Shape models for shapediff.
//!
//! A [`Model`] is an immutable description of the shape of a [`Value`]:
//! a leaf value, a bean of named properties, a list, a set, or a map. Models
//! are built once and shared read-only across any number of comparisons.
//!
//! Besides describing shape, a model interprets itself as:
//!
//! - a total order over instances ([`Model::compare`]), used to normalise
//!   output order,
//! - an order-independent content hash ([`Model::content_hash`]), used as a
//!   cheap candidate filter before exact comparison,
//! - a navigator for typed [`Path`]s ([`Model::at`], [`Model::get`],
//!   [`Model::set_at`]).
//!
//! [`Value`]: shapediff_types::Value
//! [`Path`]: shapediff_types::Path

pub mod compare;
pub mod error;
pub mod hash;
pub mod model;
pub mod navigate;

pub use error::{ModelError, ModelResult};
pub use hash::ContentHasher;
pub use model::{BeanModel, Comparator, ListModel, MapModel, Model, Property, SetModel, ValueModel};
