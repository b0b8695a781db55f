//! The diff result tree.
//!
//! A [`Diff`] mirrors the model that produced it: simple diffs for leaf
//! values, bean diffs keyed by property name, list diffs for lists and sets,
//! and map diffs keyed by entry key. Every node keeps both original values
//! (null when absent), a [`Status`] and a score in `[0, 1]`.
//!
//! # Invariants
//!
//! - A simple diff scores 1.0 iff it is `Unchanged`, else 0.0.
//! - A composite diff scores 1.0 when `Unchanged`, else the mean of its
//!   children's scores (0.0 with no children).

use std::collections::BTreeMap;

use indexmap::IndexMap;
use shapediff_types::{Path, PathElement, Status, Value};

use crate::error::{DiffError, DiffResult};

/// One node of a diff tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Diff {
    left: Value,
    right: Value,
    status: Status,
    score: f64,
    kind: DiffKind,
}

/// The shape-specific part of a diff node.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffKind {
    /// Leaf comparison.
    Simple,
    /// Per-property diffs in declaration order.
    Bean(IndexMap<String, Diff>),
    /// Per-element diffs in emission order. Used for both lists and sets.
    List(Vec<Diff>),
    /// Per-key diffs over the union of both key sets.
    Map(BTreeMap<Value, Diff>),
}

impl Diff {
    /// A leaf diff with the given status.
    pub fn simple(left: Value, right: Value, status: Status) -> Self {
        let score = if status.is_unchanged() { 1.0 } else { 0.0 };
        Self {
            left,
            right,
            status,
            score,
            kind: DiffKind::Simple,
        }
    }

    /// A bean diff whose status folds over its properties.
    pub fn bean(left: Value, right: Value, properties: IndexMap<String, Diff>) -> Self {
        let status = Status::fold(properties.values().map(Diff::status));
        Self::composite(left, right, status, DiffKind::Bean(properties))
    }

    /// A list diff whose status folds over its elements.
    pub fn list(left: Value, right: Value, elements: Vec<Diff>) -> Self {
        let status = Status::fold(elements.iter().map(Diff::status));
        Self::composite(left, right, status, DiffKind::List(elements))
    }

    /// A map diff whose status folds over its entries.
    pub fn map(left: Value, right: Value, entries: BTreeMap<Value, Diff>) -> Self {
        let status = Status::fold(entries.values().map(Diff::status));
        Self::composite(left, right, status, DiffKind::Map(entries))
    }

    /// A composite diff with an explicit status, scored from its children.
    pub fn composite(left: Value, right: Value, status: Status, kind: DiffKind) -> Self {
        let score = if status.is_unchanged() {
            1.0
        } else {
            let (sum, count) = match &kind {
                DiffKind::Simple => (0.0, 0),
                DiffKind::Bean(props) => sum_scores(props.values()),
                DiffKind::List(items) => sum_scores(items.iter()),
                DiffKind::Map(entries) => sum_scores(entries.values()),
            };
            if count == 0 {
                0.0
            } else {
                sum / count as f64
            }
        };
        Self {
            left,
            right,
            status,
            score,
            kind,
        }
    }

    /// The left-hand value; null when absent.
    pub fn left(&self) -> &Value {
        &self.left
    }

    /// The right-hand value; null when absent.
    pub fn right(&self) -> &Value {
        &self.right
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Similarity in `[0, 1]`; 1.0 means unchanged.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn kind(&self) -> &DiffKind {
        &self.kind
    }

    pub fn is_unchanged(&self) -> bool {
        self.status.is_unchanged()
    }

    /// Short name of the node kind.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            DiffKind::Simple => "simple",
            DiffKind::Bean(_) => "bean",
            DiffKind::List(_) => "list",
            DiffKind::Map(_) => "map",
        }
    }

    /// Direct children with the path step that reaches each of them.
    pub fn children(&self) -> Vec<(PathElement, &Diff)> {
        match &self.kind {
            DiffKind::Simple => Vec::new(),
            DiffKind::Bean(props) => props
                .iter()
                .map(|(name, d)| (PathElement::Property(name.clone()), d))
                .collect(),
            DiffKind::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, d)| (PathElement::Index(i), d))
                .collect(),
            DiffKind::Map(entries) => entries
                .iter()
                .map(|(k, d)| (PathElement::Key(k.clone()), d))
                .collect(),
        }
    }

    /// Pre-order walk. The callback receives each node with its path from
    /// this node and returns whether to descend into that node's children.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(&Path, &Diff) -> bool,
    {
        let mut path = Path::root();
        self.walk(&mut path, &mut callback);
    }

    fn walk<F>(&self, path: &mut Path, callback: &mut F)
    where
        F: FnMut(&Path, &Diff) -> bool,
    {
        if !callback(path, self) {
            return;
        }
        for (step, child) in self.children() {
            path.push(step);
            child.walk(path, callback);
            path.pop();
        }
    }

    /// The node addressed by `path`.
    ///
    /// Each step must match the node it is applied to: an index for a list
    /// diff, a key for a map diff, a property for a bean diff. Simple diffs
    /// cannot be navigated into.
    pub fn extract(&self, path: &Path) -> DiffResult<&Diff> {
        path.iter().try_fold(self, |node, step| node.child(step))
    }

    fn child(&self, step: &PathElement) -> DiffResult<&Diff> {
        let found = match (step, &self.kind) {
            (PathElement::Index(i), DiffKind::List(items)) => items.get(*i),
            (PathElement::Key(key), DiffKind::Map(entries)) => entries.get(key),
            (PathElement::Property(name), DiffKind::Bean(props)) => props.get(name),
            _ => {
                return Err(DiffError::UnsupportedNavigation {
                    step: format!("{} {step}", step.kind_name()),
                    node: self.kind_name(),
                })
            }
        };
        found.ok_or_else(|| DiffError::NotFound {
            step: step.to_string(),
        })
    }

    /// Flatten the tree into `"{root_label}{path}" -> node`, in pre-order.
    pub fn to_map(&self, root_label: &str) -> IndexMap<String, &Diff> {
        let mut flat = IndexMap::new();
        self.collect_into(root_label, &mut Path::root(), &mut flat);
        flat
    }

    fn collect_into<'a>(&'a self, root_label: &str, path: &mut Path, flat: &mut IndexMap<String, &'a Diff>) {
        flat.insert(format!("{root_label}{path}"), self);
        for (step, child) in self.children() {
            path.push(step);
            child.collect_into(root_label, path, flat);
            path.pop();
        }
    }

    /// Count nodes per status over the whole tree.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        self.traverse(|_, node| {
            summary.record(node.status);
            true
        });
        summary
    }
}

fn sum_scores<'a>(diffs: impl Iterator<Item = &'a Diff>) -> (f64, usize) {
    diffs.fold((0.0, 0), |(sum, count), d| (sum + d.score, count + 1))
}

/// Node counts per status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    fn record(&mut self, status: Status) {
        match status {
            Status::Added => self.added += 1,
            Status::Removed => self.removed += 1,
            Status::Modified => self.modified += 1,
            Status::Unchanged => self.unchanged += 1,
        }
    }

    /// Total number of nodes counted.
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified + self.unchanged
    }

    /// Number of nodes that are not unchanged.
    pub fn changes(&self) -> usize {
        self.added + self.removed + self.modified
    }
}
