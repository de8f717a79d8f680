//! Common types for bootstrap intervals

use serde::{Deserialize, Serialize};
use std::fmt;

/// A confidence interval with lower and upper bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Point estimate from the original series
    pub estimate: f64,
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    pub fn new(lower: f64, upper: f64, estimate: f64, confidence_level: f64) -> Self {
        Self {
            lower,
            upper,
            estimate,
            confidence_level,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Closed-interval membership
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn overlaps(&self, other: &ConfidenceInterval) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% CI: [{:.4}, {:.4}], estimate: {:.4}",
            self.confidence_level * 100.0,
            self.lower,
            self.upper,
            self.estimate
        )
    }
}

/// 2.5th, 50th and 97.5th percentiles of a bootstrap distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapPercentiles {
    pub p025: f64,
    pub p50: f64,
    pub p975: f64,
}

impl BootstrapPercentiles {
    /// Percentiles of an ascending-sorted sample
    pub fn from_sorted(sorted: &[f64]) -> Self {
        Self {
            p025: par_core::math::percentile_sorted(sorted, 0.025),
            p50: par_core::math::percentile_sorted(sorted, 0.5),
            p975: par_core::math::percentile_sorted(sorted, 0.975),
        }
    }
}
