//! Score optimizers for shapediff.
//!
//! A [`ScoreOptimizer`] solves the weighted bipartite assignment problem used
//! to reconcile unordered collections: given a `rows × cols` score matrix
//! with `rows <= cols`, pick a distinct column for every row so that the sum
//! of the selected scores is maximal.
//!
//! Two strategies are provided:
//!
//! - [`ExactOptimizer`] -- branch-and-bound search under a wall-clock budget
//! - [`GreedyOptimizer`] -- repeatedly takes the best remaining pair

pub mod error;
pub mod exact;
pub mod greedy;
pub mod kind;

pub use error::{OptimizerError, OptimizerResult};
pub use exact::ExactOptimizer;
pub use greedy::GreedyOptimizer;
pub use kind::OptimizerKind;

/// Solver for the assignment problem.
///
/// Implementations must be stateless between calls so a single optimizer can
/// be shared by concurrent diffs.
pub trait ScoreOptimizer: Send + Sync {
    /// Assign each of `rows` rows to a distinct column of `matrix`.
    ///
    /// `matrix` holds `rows` rows of `cols` scores in `[0, 1]`. The returned
    /// vector has length `rows`; entry `r` is the column chosen for row `r`.
    fn solve(&self, rows: usize, cols: usize, matrix: &[Vec<f64>]) -> OptimizerResult<Vec<usize>>;

    /// Short name of the strategy, used in logs.
    fn name(&self) -> &'static str;
}

/// Check the `0 < rows <= cols` precondition and the matrix dimensions.
pub(crate) fn check_shape(rows: usize, cols: usize, matrix: &[Vec<f64>]) -> OptimizerResult<()> {
    if rows == 0 || rows > cols || matrix.len() != rows || matrix.iter().any(|row| row.len() != cols) {
        return Err(OptimizerError::ShapeMismatch { rows, cols });
    }
    Ok(())
}

/// Sum of the scores selected by `assignment`.
pub fn total_score(matrix: &[Vec<f64>], assignment: &[usize]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .map(|(row, &col)| matrix[row][col])
        .sum()
}
