//! Fuzzy alignment of ordered sequences.
//!
//! The alignment keeps a cursor into each side. At every step it scans
//! offsets `d = 0, 1, 2, ...` in lock-step, trying `left[i + d]` against
//! `right[j]` and then `left[i]` against `right[j + d]`; the first pair whose
//! recursive diff reaches the threshold becomes the next synchronisation
//! point. Left elements skipped to reach it are emitted as removed, right
//! elements skipped as added, then the matched pair's own diff is emitted.
//! Once no synchronisation point is left, the remaining left elements are
//! removed and the remaining right elements added.
//!
//! When both a removed and an added batch are pending at the same point,
//! a flag that flips after every emitted batch decides which goes first.
//!
//! Every candidate costs a full recursive diff, so the worst case is
//! `O(n · m)` diffs.

use shapediff_model::ListModel;
use shapediff_types::{Status, Value};
use tracing::debug;

use super::{one_sided, DiffEngine};
use crate::error::DiffResult;
use crate::tree::Diff;

/// Emission state shared by every flush of one alignment.
struct Emitter<'m> {
    element: &'m shapediff_model::Model,
    out: Vec<Diff>,
    remove_first: bool,
    removed: usize,
    added: usize,
}

impl Emitter<'_> {
    fn flush(&mut self, removed: &[Value], added: &[Value]) -> DiffResult<()> {
        if removed.is_empty() && added.is_empty() {
            return Ok(());
        }
        if self.remove_first {
            self.emit(removed, Status::Removed)?;
            self.emit(added, Status::Added)?;
        } else {
            self.emit(added, Status::Added)?;
            self.emit(removed, Status::Removed)?;
        }
        self.remove_first = !self.remove_first;
        Ok(())
    }

    fn emit(&mut self, items: &[Value], status: Status) -> DiffResult<()> {
        for item in items {
            self.out.push(one_sided(self.element, item, status)?);
        }
        match status {
            Status::Removed => self.removed += items.len(),
            _ => self.added += items.len(),
        }
        Ok(())
    }
}

impl DiffEngine<'_> {
    pub(super) fn diff_list(&self, list: &ListModel, left: &Value, right: &Value) -> DiffResult<Diff> {
        let lefts = list.apply(left)?;
        let rights = list.apply(right)?;
        let element = list.element();

        let mut emitter = Emitter {
            element,
            out: Vec::with_capacity(lefts.len().max(rights.len())),
            remove_first: true,
            removed: 0,
            added: 0,
        };
        let mut matched = 0usize;
        let (mut i, mut j) = (0usize, 0usize);

        while i < lefts.len() && j < rights.len() {
            let Some((a, b, pair)) = self.next_sync(element, lefts, rights, i, j)? else {
                break;
            };
            emitter.flush(&lefts[i..a], &rights[j..b])?;
            emitter.out.push(pair);
            matched += 1;
            i = a + 1;
            j = b + 1;
        }
        emitter.flush(&lefts[i..], &rights[j..])?;

        debug!(
            left = lefts.len(),
            right = rights.len(),
            matched,
            removed = emitter.removed,
            added = emitter.added,
            "list aligned"
        );
        Ok(Diff::list(left.clone(), right.clone(), emitter.out))
    }

    /// Find the nearest synchronisation point from cursors `(i, j)`.
    fn next_sync(
        &self,
        element: &shapediff_model::Model,
        lefts: &[Value],
        rights: &[Value],
        i: usize,
        j: usize,
    ) -> DiffResult<Option<(usize, usize, Diff)>> {
        let mut d = 0;
        loop {
            let a = i + d;
            let b = j + d;
            if a >= lefts.len() && b >= rights.len() {
                return Ok(None);
            }
            if a < lefts.len() {
                let pair = self.node(element, &lefts[a], &rights[j])?;
                if self.accepts(&pair) {
                    return Ok(Some((a, j, pair)));
                }
            }
            if d > 0 && b < rights.len() {
                let pair = self.node(element, &lefts[i], &rights[b])?;
                if self.accepts(&pair) {
                    return Ok(Some((i, b, pair)));
                }
            }
            d += 1;
        }
    }
}
