//! Greedy approximate assignment.

use tracing::trace;

use crate::error::OptimizerResult;
use crate::{check_shape, ScoreOptimizer};

/// Repeatedly picks the highest-scoring pair among unused rows and columns.
///
/// Runs in `O(rows² · cols)` with no time budget. The result is a valid
/// assignment but not necessarily an optimal one. Ties go to the lowest row,
/// then the lowest column.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyOptimizer;

impl ScoreOptimizer for GreedyOptimizer {
    fn solve(&self, rows: usize, cols: usize, matrix: &[Vec<f64>]) -> OptimizerResult<Vec<usize>> {
        check_shape(rows, cols, matrix)?;

        let mut assignment = vec![usize::MAX; rows];
        let mut row_used = vec![false; rows];
        let mut col_used = vec![false; cols];

        for _ in 0..rows {
            let mut best: Option<(usize, usize, f64)> = None;
            for (row, scores) in matrix.iter().enumerate() {
                if row_used[row] {
                    continue;
                }
                for (col, &score) in scores.iter().enumerate() {
                    if col_used[col] {
                        continue;
                    }
                    if best.map_or(true, |(_, _, top)| score > top) {
                        best = Some((row, col, score));
                    }
                }
            }
            // rows <= cols guarantees a free pair on every round.
            if let Some((row, col, _)) = best {
                row_used[row] = true;
                col_used[col] = true;
                assignment[row] = col;
            }
        }

        trace!(rows, cols, "greedy assignment solved");
        Ok(assignment)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
