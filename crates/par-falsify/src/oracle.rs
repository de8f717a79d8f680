//! Accept/reject oracle for falsification fixtures

use crate::fixtures::{Expectation, Fixture};
use par_ar::fit_ar2;
use par_core::{EngineConfig, Result};
use par_diagnostics::{DiagnosticKind, Diagnostics, Severity};
use par_stability::{FitGrade, StabilityClassifier, StabilityZone};
use serde::{Deserialize, Serialize};

/// What the engine concluded about one fixture and whether that matches
/// the fixture's expectation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureVerdict {
    pub fixture: String,
    pub class: String,
    pub upheld: bool,
    pub raw_modulus: f64,
    pub r_squared: f64,
    pub zone: StabilityZone,
    pub grade: FitGrade,
    pub trend_critical: bool,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct FalsificationOracle {
    classifier: StabilityClassifier,
    diagnostics: Diagnostics,
    /// Raw modulus above which a series counts as unstable
    instability_threshold: f64,
}

impl Default for FalsificationOracle {
    fn default() -> Self {
        Self {
            classifier: StabilityClassifier::default(),
            diagnostics: Diagnostics::default(),
            instability_threshold: 0.93,
        }
    }
}

impl FalsificationOracle {
    /// The instability threshold is the lower edge of the boundary-proximity band
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: StabilityClassifier::from_config(config)?,
            diagnostics: Diagnostics::from_config(config)?,
            instability_threshold: config.diagnostics.boundary_lower,
        })
    }

    pub fn instability_threshold(&self) -> f64 {
        self.instability_threshold
    }

    pub fn judge(&self, fixture: &Fixture) -> FixtureVerdict {
        let fit = fit_ar2(&fixture.series);
        let assessment = self.classifier.assess(&fit);
        let report = self.diagnostics.run_with_fit(&fixture.series, &fit);
        let trend_critical = report.severity_of(DiagnosticKind::Trend) == Some(Severity::Critical);
        let weak_fit = assessment.grade != FitGrade::Good;
        let raw = assessment.raw_modulus;

        let (upheld, reason) = match fixture.expectation {
            Expectation::Nonsense => {
                let upheld = weak_fit || !assessment.zone.is_stable();
                let reason = if upheld {
                    format!("rejected: fit {} in {} zone", assessment.grade, assessment.zone)
                } else {
                    format!("accepted as persistence: |λ| = {raw:.3} in {} zone", assessment.zone)
                };
                (upheld, reason)
            }
            Expectation::NonRecurrent => {
                let upheld = weak_fit || trend_critical;
                let reason = if trend_critical {
                    "critical trend flag".to_string()
                } else if upheld {
                    format!("fit {}", assessment.grade)
                } else {
                    "good fit without a trend flag".to_string()
                };
                (upheld, reason)
            }
            Expectation::Adversarial => {
                let upheld = raw > self.instability_threshold;
                let relation = if upheld { "above" } else { "not above" };
                (
                    upheld,
                    format!("|λ| = {raw:.4} {relation} threshold {:.2}", self.instability_threshold),
                )
            }
            Expectation::Control {
                truth,
                tolerance,
                theoretical_r_squared,
            } => {
                let error = (raw - truth).abs();
                let recovered = fit.is_ok() && error <= tolerance;
                let needs_good = theoretical_r_squared
                    .is_some_and(|r2| self.classifier.grade_fit(r2) == FitGrade::Good);
                let grade_ok = !needs_good || assessment.grade == FitGrade::Good;
                let reason = if !recovered {
                    format!("|λ| = {raw:.4} misses truth {truth} by {error:.4}")
                } else if !grade_ok {
                    format!("generating process grades GOOD but fit is {}", assessment.grade)
                } else {
                    format!("|λ| = {raw:.4} within {tolerance} of {truth}")
                };
                (recovered && grade_ok, reason)
            }
        };

        FixtureVerdict {
            fixture: fixture.name.clone(),
            class: fixture.expectation.class_name().to_string(),
            upheld,
            raw_modulus: raw,
            r_squared: fit.r_squared,
            zone: assessment.zone,
            grade: assessment.grade,
            trend_critical,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{exponential_growth, simulate_ar2};
    use std::f64::consts::PI;

    #[test]
    fn test_control_with_wrong_truth_is_violated() {
        let oracle = FalsificationOracle::default();
        let fixture = Fixture::new(
            "mislabelled",
            Expectation::Control {
                truth: 0.3,
                tolerance: 0.05,
                theoretical_r_squared: None,
            },
            simulate_ar2(0.8, PI / 3.0, 2000, 0.01, 2),
        );
        let verdict = oracle.judge(&fixture);
        assert!(!verdict.upheld);
        assert!(verdict.reason.contains("misses truth"), "{}", verdict.reason);
    }

    #[test]
    fn test_growth_trips_trend_flag() {
        let oracle = FalsificationOracle::default();
        let fixture = Fixture::new("growth", Expectation::NonRecurrent, exponential_growth(48, 0.05));
        let verdict = oracle.judge(&fixture);
        assert!(verdict.trend_critical);
        assert!(verdict.upheld);
    }

    #[test]
    fn test_threshold_follows_config() {
        let mut config = EngineConfig::default();
        config.diagnostics.boundary_lower = 0.9;
        let oracle = FalsificationOracle::from_config(&config).unwrap();
        assert_eq!(oracle.instability_threshold(), 0.9);
        assert_eq!(FalsificationOracle::default().instability_threshold(), 0.93);
    }
}
