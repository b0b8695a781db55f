//! Exact assignment by branch-and-bound.
//!
//! Rows are assigned in order by depth-first search over the unused
//! columns. Since no cell scores above 1.0, a branch whose current score plus
//! one point per unassigned row cannot beat the best complete assignment is
//! pruned. Ties keep the first assignment found, which favours lower column
//! indices for earlier rows.
//!
//! The search polls a wall-clock deadline every `step_interval` visited
//! nodes and aborts with [`OptimizerError::Timeout`] once it has passed.

use std::time::{Duration, Instant};

use tracing::{trace, warn};

use crate::error::{OptimizerError, OptimizerResult};
use crate::{check_shape, ScoreOptimizer};

/// Default wall-clock budget for a single solve.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(10);

/// Default number of search steps between deadline checks.
pub const DEFAULT_STEP_INTERVAL: u64 = 1024;

/// Optimal assignment within a time budget.
#[derive(Clone, Debug)]
pub struct ExactOptimizer {
    budget: Duration,
    step_interval: u64,
}

impl Default for ExactOptimizer {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            step_interval: DEFAULT_STEP_INTERVAL,
        }
    }
}

impl ExactOptimizer {
    /// Create an optimizer with the given budget and poll interval.
    ///
    /// A zero `step_interval` is treated as 1.
    pub fn new(budget: Duration, step_interval: u64) -> Self {
        Self {
            budget,
            step_interval: step_interval.max(1),
        }
    }
}

impl ScoreOptimizer for ExactOptimizer {
    fn solve(&self, rows: usize, cols: usize, matrix: &[Vec<f64>]) -> OptimizerResult<Vec<usize>> {
        check_shape(rows, cols, matrix)?;

        let started = Instant::now();
        let mut search = Search {
            matrix,
            rows,
            cols,
            used: vec![false; cols],
            current: vec![0; rows],
            best: Vec::new(),
            best_score: f64::NEG_INFINITY,
            steps: 0,
            step_interval: self.step_interval,
            deadline: started + self.budget,
            budget: self.budget,
        };
        if let Err(err) = search.descend(0, 0.0) {
            warn!(
                rows,
                cols,
                steps = search.steps,
                budget_ms = self.budget.as_millis() as u64,
                "exact assignment timed out"
            );
            return Err(err);
        }

        trace!(
            rows,
            cols,
            steps = search.steps,
            score = search.best_score,
            elapsed_us = started.elapsed().as_micros() as u64,
            "exact assignment solved"
        );
        Ok(search.best)
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

struct Search<'m> {
    matrix: &'m [Vec<f64>],
    rows: usize,
    cols: usize,
    used: Vec<bool>,
    current: Vec<usize>,
    best: Vec<usize>,
    best_score: f64,
    steps: u64,
    step_interval: u64,
    deadline: Instant,
    budget: Duration,
}

impl Search<'_> {
    fn descend(&mut self, row: usize, score: f64) -> OptimizerResult<()> {
        self.steps += 1;
        if self.steps % self.step_interval == 0 && Instant::now() >= self.deadline {
            return Err(OptimizerError::Timeout {
                budget: self.budget,
            });
        }

        if row == self.rows {
            if score > self.best_score {
                self.best_score = score;
                self.best.clone_from(&self.current);
            }
            return Ok(());
        }

        if score + (self.rows - row) as f64 <= self.best_score {
            return Ok(());
        }

        for col in 0..self.cols {
            if self.used[col] {
                continue;
            }
            self.used[col] = true;
            self.current[row] = col;
            let result = self.descend(row + 1, score + self.matrix[row][col]);
            self.used[col] = false;
            result?;
        }
        Ok(())
    }
}
