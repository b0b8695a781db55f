use std::time::Duration;

use serde::{Deserialize, Serialize};
use shapediff_optimizer::{exact, OptimizerKind, ScoreOptimizer};

use crate::error::{DiffError, DiffResult};

/// Configuration for a diff computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Minimum score at which two list or set elements count as the same
    /// item. Must lie in `(0, 1]`.
    pub threshold: f64,
    /// Strategy used to reconcile unordered collections.
    pub optimizer: OptimizerKind,
    /// Wall-clock budget of the exact optimizer, per set.
    pub exact_timeout: Duration,
    /// Search steps between deadline checks of the exact optimizer.
    pub step_interval: u64,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            optimizer: OptimizerKind::Exact,
            exact_timeout: exact::DEFAULT_BUDGET,
            step_interval: exact::DEFAULT_STEP_INTERVAL,
        }
    }
}

impl DiffConfig {
    /// A configuration that only pairs fully unchanged elements.
    pub fn strict() -> Self {
        Self {
            threshold: 1.0,
            ..Default::default()
        }
    }

    /// A configuration using the greedy optimizer, for large sets or as a
    /// retry after an exact-search timeout.
    pub fn approximate() -> Self {
        Self {
            optimizer: OptimizerKind::Approximate,
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document. Missing fields take their
    /// default values.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| DiffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> DiffResult<()> {
        validate_threshold(self.threshold)?;
        if self.step_interval == 0 {
            return Err(DiffError::Config("step_interval must be positive".into()));
        }
        Ok(())
    }

    /// Build the configured optimizer.
    pub fn build_optimizer(&self) -> Box<dyn ScoreOptimizer> {
        self.optimizer.build(self.exact_timeout, self.step_interval)
    }
}

/// Reject thresholds outside `(0, 1]` (including NaN).
pub(crate) fn validate_threshold(threshold: f64) -> DiffResult<()> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(DiffError::InvalidThreshold(threshold))
    }
}
