//! Reconciliation of unordered collections.
//!
//! Runs in four phases:
//!
//! 1. **Exact pass.** Elements are bucketed by their order-independent
//!    content hash. Each left element is paired with the first unused right
//!    element in its bucket whose recursive diff is unchanged. A shared hash
//!    is only a candidate; collisions fall through to the next phases.
//! 2. **Scoring.** Every remaining pair is diffed. Pairs below the threshold
//!    are recorded as "no match"; rows and columns with no match at all are
//!    emitted immediately as removed or added.
//! 3. **Assignment.** The optimizer pairs the smaller residual side with an
//!    equal-sized subset of the larger one, maximising the total score.
//!    Pairs forced onto a "no match" cell are emitted as a removal plus an
//!    addition.
//! 4. **Leftovers.** Elements outside the assignment are removed or added.
//!
//! Both sides are put in canonical order before the first phase: the
//! model-derived comparator first, the structural order of [`Value`] to break
//! its ties. Every later phase, including the optimizers' tie-breaking, only
//! ever sees that order, so the result never depends on input iteration
//! order. The output is sorted with the model-derived comparator on the left
//! value, or the right value when the left is absent.

use std::cmp::Ordering;
use std::collections::HashMap;

use shapediff_model::{Model, SetModel};
use shapediff_types::{Status, Value};
use tracing::debug;

use super::{one_sided, DiffEngine};
use crate::error::{DiffError, DiffResult};
use crate::tree::Diff;

impl DiffEngine<'_> {
    pub(super) fn diff_set(&self, set: &SetModel, left: &Value, right: &Value) -> DiffResult<Diff> {
        let element = set.element();
        let lefts = canonical(element, set.apply(left)?)?;
        let rights = canonical(element, set.apply(right)?)?;

        let mut out = Vec::with_capacity(lefts.len().max(rights.len()));
        let mut left_done = vec![false; lefts.len()];
        let mut right_done = vec![false; rights.len()];

        // Phase 1: exact matches among equal hashes.
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        for (j, item) in rights.iter().enumerate() {
            buckets.entry(element.content_hash(item)).or_default().push(j);
        }
        for (i, item) in lefts.iter().enumerate() {
            let Some(candidates) = buckets.get(&element.content_hash(item)) else {
                continue;
            };
            for &j in candidates {
                if right_done[j] {
                    continue;
                }
                let pair = self.node(element, item, rights[j])?;
                if pair.is_unchanged() {
                    out.push(pair);
                    left_done[i] = true;
                    right_done[j] = true;
                    break;
                }
            }
        }
        let exact = out.len();

        // Phase 2: score the residual pairs.
        let rows: Vec<&Value> = lefts
            .iter()
            .zip(&left_done)
            .filter_map(|(item, done)| (!done).then_some(*item))
            .collect();
        let cols: Vec<&Value> = rights
            .iter()
            .zip(&right_done)
            .filter_map(|(item, done)| (!done).then_some(*item))
            .collect();

        let mut cells = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut line = Vec::with_capacity(cols.len());
            for col in &cols {
                let pair = self.node(element, row, col)?;
                line.push(self.accepts(&pair).then_some(pair));
            }
            cells.push(line);
        }

        let live_rows: Vec<usize> = (0..rows.len())
            .filter(|&r| cells[r].iter().any(Option::is_some))
            .collect();
        let live_cols: Vec<usize> = (0..cols.len())
            .filter(|&c| cells.iter().any(|line| line[c].is_some()))
            .collect();
        let unmatched = (rows.len() - live_rows.len(), cols.len() - live_cols.len());

        for r in (0..rows.len()).filter(|r| !live_rows.contains(r)) {
            out.push(one_sided(element, rows[r], Status::Removed)?);
        }
        for c in (0..cols.len()).filter(|c| !live_cols.contains(c)) {
            out.push(one_sided(element, cols[c], Status::Added)?);
        }

        // Phases 3 and 4: assignment and leftovers.
        // A live row implies a live column and vice versa.
        let assigned = if live_rows.is_empty() {
            0
        } else {
            self.assign(element, &rows, &cols, &mut cells, &live_rows, &live_cols, &mut out)?
        };

        out.sort_by(|a, b| element.compare(sort_key(a), sort_key(b)));

        debug!(
            left = lefts.len(),
            right = rights.len(),
            exact,
            unmatched_left = unmatched.0,
            unmatched_right = unmatched.1,
            assigned,
            "set reconciled"
        );
        Ok(Diff::list(left.clone(), right.clone(), out))
    }

    /// Pair live rows with live columns through the optimizer and flush
    /// everything the assignment leaves out. Returns the number of real
    /// matches.
    #[allow(clippy::too_many_arguments)]
    fn assign(
        &self,
        element: &Model,
        rows: &[&Value],
        cols: &[&Value],
        cells: &mut [Vec<Option<Diff>>],
        live_rows: &[usize],
        live_cols: &[usize],
        out: &mut Vec<Diff>,
    ) -> DiffResult<usize> {
        // The optimizer needs no more rows than columns.
        let transposed = live_rows.len() > live_cols.len();
        let (k, n) = if transposed {
            (live_cols.len(), live_rows.len())
        } else {
            (live_rows.len(), live_cols.len())
        };
        let cell_at = |a: usize, b: usize| if transposed { (b, a) } else { (a, b) };

        let scores: Vec<Vec<f64>> = (0..k)
            .map(|a| {
                (0..n)
                    .map(|b| {
                        let (ri, ci) = cell_at(a, b);
                        cells[live_rows[ri]][live_cols[ci]]
                            .as_ref()
                            .map_or(0.0, Diff::score)
                    })
                    .collect()
            })
            .collect();

        let assignment = self.optimizer.solve(k, n, &scores)?;

        let mut row_used = vec![false; live_rows.len()];
        let mut col_used = vec![false; live_cols.len()];
        let mut matched = 0;
        for (a, &b) in assignment.iter().enumerate() {
            let (ri, ci) = cell_at(a, b);
            row_used[ri] = true;
            col_used[ci] = true;
            let (r, c) = (live_rows[ri], live_cols[ci]);
            match cells[r][c].take() {
                Some(pair) => {
                    out.push(pair);
                    matched += 1;
                }
                None => {
                    out.push(one_sided(element, rows[r], Status::Removed)?);
                    out.push(one_sided(element, cols[c], Status::Added)?);
                }
            }
        }

        for (ri, _) in row_used.iter().enumerate().filter(|(_, used)| !**used) {
            out.push(one_sided(element, rows[live_rows[ri]], Status::Removed)?);
        }
        for (ci, _) in col_used.iter().enumerate().filter(|(_, used)| !**used) {
            out.push(one_sided(element, cols[live_cols[ci]], Status::Added)?);
        }
        Ok(matched)
    }
}

fn sort_key(diff: &Diff) -> &Value {
    if diff.left().is_null() {
        diff.right()
    } else {
        diff.left()
    }
}

/// Sort `items` into canonical order, rejecting elements the model considers
/// equal.
fn canonical<'a>(element: &Model, items: &'a [Value]) -> DiffResult<Vec<&'a Value>> {
    let mut sorted: Vec<&Value> = items.iter().collect();
    sorted.sort_by(|a, b| element.compare(a, b).then_with(|| a.cmp(b)));
    if let Some(pair) = sorted
        .windows(2)
        .find(|pair| element.compare(pair[0], pair[1]) == Ordering::Equal)
    {
        return Err(DiffError::DuplicateKey(format!("set element {}", pair[1])));
    }
    Ok(sorted)
}
