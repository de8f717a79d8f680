//! Uncertainty-aware clock-vs-target gap

use par_core::math;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the clock/target persistence hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HierarchyCall {
    /// Clock genes more persistent than targets
    Preserved,
    /// Targets more persistent than clock genes
    Reversed,
    /// Gap smaller than its combined uncertainty
    Uncertain,
}

impl fmt::Display for HierarchyCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preserved => write!(f, "preserved"),
            Self::Reversed => write!(f, "reversed"),
            Self::Uncertain => write!(f, "uncertain"),
        }
    }
}

/// Clock-minus-target mean eigenvalue gap with propagated uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearboxGap {
    pub clock_mean: f64,
    pub target_mean: f64,
    pub gap: f64,
    #[serde(deserialize_with = "par_core::float::unbounded")]
    pub clock_uncertainty: f64,
    #[serde(deserialize_with = "par_core::float::unbounded")]
    pub target_uncertainty: f64,
    /// `sqrt(σ_clock² + σ_target²)`
    #[serde(deserialize_with = "par_core::float::unbounded")]
    pub uncertainty: f64,
    pub call: HierarchyCall,
}

impl GearboxGap {
    /// Gap from group means and per-group uncertainties
    pub fn new(clock_mean: f64, target_mean: f64, clock_uncertainty: f64, target_uncertainty: f64) -> Self {
        let gap = clock_mean - target_mean;
        let uncertainty = clock_uncertainty.hypot(target_uncertainty);
        let call = if !(gap.abs() >= uncertainty) || gap == 0.0 {
            HierarchyCall::Uncertain
        } else if gap > 0.0 {
            HierarchyCall::Preserved
        } else {
            HierarchyCall::Reversed
        };
        Self {
            clock_mean,
            target_mean,
            gap,
            clock_uncertainty,
            target_uncertainty,
            uncertainty,
            call,
        }
    }

    /// Gap from per-gene moduli, using the standard error of each group mean
    ///
    /// A single-gene group has unbounded uncertainty, so its call is always
    /// `Uncertain`. `None` when either group is empty.
    pub fn from_groups(clock: &[f64], target: &[f64]) -> Option<Self> {
        if clock.is_empty() || target.is_empty() {
            return None;
        }
        let se = |group: &[f64]| math::standard_error(group).unwrap_or(f64::INFINITY);
        Some(Self::new(
            math::mean(clock),
            math::mean(target),
            se(clock),
            se(target),
        ))
    }
}

impl fmt::Display for GearboxGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gap {:+.3} ± {:.3} ({})",
            self.gap, self.uncertainty, self.call
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calls() {
        assert_eq!(GearboxGap::new(0.8, 0.5, 0.03, 0.04).call, HierarchyCall::Preserved);
        assert_eq!(GearboxGap::new(0.5, 0.8, 0.03, 0.04).call, HierarchyCall::Reversed);
        let uncertain = GearboxGap::new(0.52, 0.5, 0.03, 0.04);
        assert_relative_eq!(uncertain.uncertainty, 0.05, epsilon = 1e-12);
        assert_eq!(uncertain.call, HierarchyCall::Uncertain);
        assert_eq!(GearboxGap::new(0.5, 0.5, 0.0, 0.0).call, HierarchyCall::Uncertain);
    }

    #[test]
    fn test_from_groups_standard_error() {
        let clock = [0.80, 0.82, 0.84, 0.86];
        let target = [0.40, 0.50, 0.60];
        let gap = GearboxGap::from_groups(&clock, &target).unwrap();
        assert_relative_eq!(gap.gap, 0.83 - 0.5, epsilon = 1e-12);
        assert_relative_eq!(gap.target_uncertainty, 0.1 / 3f64.sqrt(), epsilon = 1e-12);
        assert_eq!(gap.call, HierarchyCall::Preserved);
        assert!(gap.to_string().contains("preserved"));
    }

    #[test]
    fn test_single_gene_group_is_uncertain() {
        let gap = GearboxGap::from_groups(&[0.9], &[0.3, 0.35, 0.4]).unwrap();
        assert!(gap.uncertainty.is_infinite());
        assert_eq!(gap.call, HierarchyCall::Uncertain);
        assert!(GearboxGap::from_groups(&[], &[0.3]).is_none());
        // Infinite uncertainty serialises as null
        let json = serde_json::to_value(gap).unwrap();
        assert!(json["uncertainty"].is_null());
        let back: GearboxGap = serde_json::from_value(json).unwrap();
        assert_eq!(back.clock_uncertainty, f64::INFINITY);
        assert_eq!(back.uncertainty, f64::INFINITY);
        assert_eq!(back.call, HierarchyCall::Uncertain);
    }
}
