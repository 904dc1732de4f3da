//! Engine configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Validation and confidence threshold configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Populated fields below this confidence are flagged for manual review
    pub require_manual_review_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_manual_review_threshold: 0.5,
        }
    }
}

impl ValidationConfig {
    /// Override the manual review threshold
    pub fn with_review_threshold(mut self, threshold: f64) -> Self {
        self.require_manual_review_threshold = threshold;
        self
    }

    /// Check that every setting is within range
    pub fn validate(&self) -> Result<()> {
        check_unit_interval(
            "require_manual_review_threshold",
            self.require_manual_review_threshold,
        )
    }
}

/// Reject values that are NaN or outside `[0, 1]`
pub(crate) fn check_unit_interval(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_input(
            field,
            format!("{} must be between 0.0 and 1.0", value),
        ))
    }
}
