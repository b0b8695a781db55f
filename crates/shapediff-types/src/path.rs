//! Typed paths into model and diff trees.
//!
//! A [`Path`] is an ordered sequence of [`PathElement`]s. Each element kind
//! addresses exactly one kind of container: indices address lists and sets,
//! keys address maps, and property names address beans.
//!
//! Paths render as `.name`, `[index]` and `{key}` segments, so the path
//! `root.address.lines[0]` reads naturally when prefixed with a root label.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A single addressing step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathElement {
    /// Position in a list or set.
    Index(usize),
    /// Key of a map entry.
    Key(Value),
    /// Name of a bean property.
    Property(String),
}

impl PathElement {
    /// Short name of the element kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PathElement::Index(_) => "index",
            PathElement::Key(_) => "key",
            PathElement::Property(_) => "property",
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Index(i) => write!(f, "[{i}]"),
            PathElement::Key(Value::String(s)) => write!(f, "{{{s}}}"),
            PathElement::Key(key) => write!(f, "{{{key}}}"),
            PathElement::Property(name) => write!(f, ".{name}"),
        }
    }
}

/// An ordered sequence of addressing steps. The empty path is the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Path(Vec<PathElement>);

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from its elements.
    pub fn new(elements: Vec<PathElement>) -> Self {
        Self(elements)
    }

    /// Extend this path by a property step.
    pub fn property(self, name: impl Into<String>) -> Self {
        self.child(PathElement::Property(name.into()))
    }

    /// Extend this path by an index step.
    pub fn index(self, index: usize) -> Self {
        self.child(PathElement::Index(index))
    }

    /// Extend this path by a key step.
    pub fn key(self, key: impl Into<Value>) -> Self {
        self.child(PathElement::Key(key.into()))
    }

    /// Extend this path by an arbitrary step.
    pub fn child(mut self, element: PathElement) -> Self {
        self.0.push(element);
        self
    }

    /// Append a step in place.
    pub fn push(&mut self, element: PathElement) {
        self.0.push(element);
    }

    /// Remove and return the last step.
    pub fn pop(&mut self) -> Option<PathElement> {
        self.0.pop()
    }

    /// The path without its last step, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    /// The last step, if any.
    pub fn last(&self) -> Option<&PathElement> {
        self.0.last()
    }

    /// All steps in order.
    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.0 {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
