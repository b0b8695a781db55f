use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ExactOptimizer, GreedyOptimizer, ScoreOptimizer};

/// Selects an assignment strategy from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    /// [`ExactOptimizer`]: optimal, bounded by a time budget.
    #[default]
    Exact,
    /// [`GreedyOptimizer`]: fast, possibly sub-optimal.
    Approximate,
}

impl OptimizerKind {
    /// Build the optimizer. `budget` and `step_interval` only apply to the
    /// exact strategy.
    pub fn build(self, budget: Duration, step_interval: u64) -> Box<dyn ScoreOptimizer> {
        match self {
            OptimizerKind::Exact => Box::new(ExactOptimizer::new(budget, step_interval)),
            OptimizerKind::Approximate => Box::new(GreedyOptimizer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_matching_strategy() {
        let budget = Duration::from_millis(50);
        assert_eq!(OptimizerKind::Exact.build(budget, 16).name(), "exact");
        assert_eq!(OptimizerKind::Approximate.build(budget, 16).name(), "greedy");
    }

    #[test]
    fn default_is_exact() {
        assert_eq!(OptimizerKind::default(), OptimizerKind::Exact);
    }
}
