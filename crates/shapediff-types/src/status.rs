use std::fmt;

use serde::{Deserialize, Serialize};

/// Change classification of a single diff node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Present only on the right side.
    Added,
    /// Present on both sides with differences.
    Modified,
    /// Present only on the left side.
    Removed,
    /// Present on both sides and equal.
    Unchanged,
}

impl Status {
    /// Combine two statuses: equal statuses are kept, anything else is
    /// `Modified`.
    pub fn combine(self, other: Status) -> Status {
        if self == other {
            self
        } else {
            Status::Modified
        }
    }

    /// Fold [`combine`](Self::combine) over child statuses.
    ///
    /// An empty sequence folds to `Unchanged`; a single status folds to
    /// itself.
    pub fn fold<I: IntoIterator<Item = Status>>(statuses: I) -> Status {
        let mut iter = statuses.into_iter();
        match iter.next() {
            None => Status::Unchanged,
            Some(first) => iter.fold(first, Status::combine),
        }
    }

    /// The status of the mirror-image comparison (left and right swapped).
    pub fn mirror(self) -> Status {
        match self {
            Status::Added => Status::Removed,
            Status::Removed => Status::Added,
            other => other,
        }
    }

    pub fn is_unchanged(self) -> bool {
        self == Status::Unchanged
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Added => "ADDED",
            Status::Modified => "MODIFIED",
            Status::Removed => "REMOVED",
            Status::Unchanged => "UNCHANGED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
