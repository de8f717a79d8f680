//! Common types used in persistence classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persistence zone of an eigenvalue modulus
///
/// Zones are ordered by increasing persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StabilityZone {
    /// Perturbations die out within a few samples
    FastDecay,
    /// Moderate memory typical of clock-controlled targets
    Target,
    /// Strong memory typical of core clock genes
    Clock,
    /// Close to the unit circle
    NearCritical,
    /// At or beyond the unit circle
    Explosive,
}

impl StabilityZone {
    pub const ALL: [StabilityZone; 5] = [
        StabilityZone::FastDecay,
        StabilityZone::Target,
        StabilityZone::Clock,
        StabilityZone::NearCritical,
        StabilityZone::Explosive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FastDecay => "fast decay",
            Self::Target => "target",
            Self::Clock => "clock",
            Self::NearCritical => "near critical",
            Self::Explosive => "explosive",
        }
    }

    /// Target and Clock zones: stationary with meaningful memory
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Target | Self::Clock)
    }
}

impl fmt::Display for StabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Quality of an AR fit from its R²
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitGrade {
    Degenerate,
    Poor,
    Good,
}

impl fmt::Display for FitGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "GOOD"),
            Self::Poor => write!(f, "POOR"),
            Self::Degenerate => write!(f, "DEGENERATE"),
        }
    }
}

/// Zone, grade and modulus views of a single fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityAssessment {
    pub zone: StabilityZone,
    pub grade: FitGrade,
    /// Modulus used for every decision
    pub raw_modulus: f64,
    /// Modulus clamped to the presentation ceiling
    pub display_modulus: f64,
    pub within_stability_triangle: bool,
}

impl StabilityAssessment {
    /// Stable zone with a usable fit
    pub fn is_trustworthy_persistence(&self) -> bool {
        self.zone.is_stable() && self.grade != FitGrade::Degenerate
    }
}

impl fmt::Display for StabilityAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "|λ| = {:.3} ({}), fit {}",
            self.display_modulus, self.zone, self.grade
        )
    }
}
