//! Engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::ahp::{EvaluationOptions, CONSISTENCY_THRESHOLD};

const MAX_DEBOUNCE_MS: u64 = 10_000;
const MAX_SCORE_DECIMALS: usize = 6;

/// AHP engine tuning
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// CR at or above which a matrix is reported inconsistent
    #[serde(default = "default_consistency_threshold")]
    pub consistency_threshold: f64,

    /// Quiet window before a recomputation runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Fill unset alternative judgments from raw magnitudes
    #[serde(default = "default_derive_from_magnitudes")]
    pub derive_from_magnitudes: bool,

    /// Decimal places in formatted scores
    #[serde(default = "default_score_decimals")]
    pub score_decimals: usize,
}

impl EngineConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            consistency_threshold: self.consistency_threshold,
            derive_from_magnitudes: self.derive_from_magnitudes,
            score_decimals: self.score_decimals,
        }
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let threshold = self.consistency_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ValidationError::InvalidConsistencyThreshold(threshold));
        }
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ValidationError::DebounceTooLong {
                max_ms: MAX_DEBOUNCE_MS,
                actual_ms: self.debounce_ms,
            });
        }
        if self.score_decimals > MAX_SCORE_DECIMALS {
            return Err(ValidationError::TooManyScoreDecimals {
                max: MAX_SCORE_DECIMALS,
                actual: self.score_decimals,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            consistency_threshold: default_consistency_threshold(),
            debounce_ms: default_debounce_ms(),
            derive_from_magnitudes: default_derive_from_magnitudes(),
            score_decimals: default_score_decimals(),
        }
    }
}

fn default_consistency_threshold() -> f64 {
    CONSISTENCY_THRESHOLD
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_derive_from_magnitudes() -> bool {
    true
}

fn default_score_decimals() -> usize {
    2
}
