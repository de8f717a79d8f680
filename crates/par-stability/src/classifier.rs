//! Zone classification and fit grading
//!
//! Both mappings are pure, total functions of their input and the
//! configured thresholds.

use crate::types::{FitGrade, StabilityAssessment, StabilityZone};
use par_ar::ArFit;
use par_core::{EngineConfig, FitGradeThresholds, Result, ZoneBoundaries};

/// Map an eigenvalue modulus to its persistence zone
///
/// Zones are half-open on the right. Negative and NaN inputs map to
/// `FastDecay`.
pub fn classify(modulus: f64, zones: &ZoneBoundaries) -> StabilityZone {
    if !(modulus >= zones.fast_decay_upper) {
        StabilityZone::FastDecay
    } else if modulus < zones.target_upper {
        StabilityZone::Target
    } else if modulus < zones.clock_upper {
        StabilityZone::Clock
    } else if modulus < zones.explosive_lower {
        StabilityZone::NearCritical
    } else {
        StabilityZone::Explosive
    }
}

/// Grade a fit from its R²: above `good` is Good, above `poor` is Poor
pub fn grade_fit(r_squared: f64, thresholds: &FitGradeThresholds) -> FitGrade {
    if r_squared > thresholds.good {
        FitGrade::Good
    } else if r_squared > thresholds.poor {
        FitGrade::Poor
    } else {
        FitGrade::Degenerate
    }
}

/// Classifier bound to a validated set of thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityClassifier {
    zones: ZoneBoundaries,
    grades: FitGradeThresholds,
    display_ceiling: f64,
}

impl Default for StabilityClassifier {
    fn default() -> Self {
        Self {
            zones: ZoneBoundaries::default(),
            grades: FitGradeThresholds::default(),
            display_ceiling: 0.99,
        }
    }
}

impl StabilityClassifier {
    pub fn new(zones: ZoneBoundaries, grades: FitGradeThresholds) -> Result<Self> {
        zones.validate()?;
        grades.validate()?;
        Ok(Self {
            zones,
            grades,
            ..Self::default()
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.zones, config.fit_grades)?.with_display_ceiling(config.display_ceiling))
    }

    pub fn with_display_ceiling(mut self, ceiling: f64) -> Self {
        self.display_ceiling = ceiling;
        self
    }

    pub fn zones(&self) -> &ZoneBoundaries {
        &self.zones
    }

    pub fn classify(&self, modulus: f64) -> StabilityZone {
        classify(modulus, &self.zones)
    }

    pub fn grade_fit(&self, r_squared: f64) -> FitGrade {
        grade_fit(r_squared, &self.grades)
    }

    /// Zone and grade of a fit
    ///
    /// Fits that are not computable, or that come from fewer samples than
    /// the grading minimum, always grade Degenerate.
    pub fn assess(&self, fit: &ArFit) -> StabilityAssessment {
        let samples = fit.effective_observations + fit.order.lags();
        let grade = if !fit.is_ok() || samples < self.grades.min_samples {
            FitGrade::Degenerate
        } else {
            self.grade_fit(fit.r_squared)
        };
        StabilityAssessment {
            zone: self.classify(fit.eigenvalue_modulus),
            grade,
            raw_modulus: fit.eigenvalue_modulus,
            display_modulus: fit.display_modulus(self.display_ceiling),
            within_stability_triangle: fit.within_stability_triangle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use par_ar::fit_ar2;

    #[test]
    fn test_zone_boundaries_are_half_open() {
        let zones = ZoneBoundaries::default();
        assert_eq!(classify(0.0, &zones), StabilityZone::FastDecay);
        assert_eq!(classify(0.399, &zones), StabilityZone::FastDecay);
        assert_eq!(classify(0.40, &zones), StabilityZone::Target);
        assert_eq!(classify(0.60, &zones), StabilityZone::Clock);
        assert_eq!(classify(0.80, &zones), StabilityZone::NearCritical);
        assert_eq!(classify(0.999, &zones), StabilityZone::NearCritical);
        assert_eq!(classify(1.0, &zones), StabilityZone::Explosive);
        assert_eq!(classify(3.5, &zones), StabilityZone::Explosive);
    }

    #[test]
    fn test_classify_is_total() {
        let zones = ZoneBoundaries::default();
        assert_eq!(classify(f64::NAN, &zones), StabilityZone::FastDecay);
        assert_eq!(classify(-0.5, &zones), StabilityZone::FastDecay);
        assert_eq!(classify(f64::INFINITY, &zones), StabilityZone::Explosive);
    }

    #[test]
    fn test_presets_shift_boundaries() {
        let bridge = ZoneBoundaries::simulator_bridge();
        assert_eq!(classify(0.5, &bridge), StabilityZone::FastDecay);
        assert_eq!(classify(0.9, &bridge), StabilityZone::Clock);
        let narrow = ZoneBoundaries::narrow_stable_band();
        assert_eq!(classify(0.77, &narrow), StabilityZone::NearCritical);
    }

    #[test]
    fn test_grade_thresholds() {
        let t = FitGradeThresholds::default();
        assert_eq!(grade_fit(0.71, &t), FitGrade::Good);
        assert_eq!(grade_fit(0.7, &t), FitGrade::Poor);
        assert_eq!(grade_fit(0.31, &t), FitGrade::Poor);
        assert_eq!(grade_fit(0.3, &t), FitGrade::Degenerate);
        assert_eq!(grade_fit(-1.0, &t), FitGrade::Degenerate);
        assert_eq!(grade_fit(f64::NAN, &t), FitGrade::Degenerate);
    }

    #[test]
    fn test_assess_not_computable_fit() {
        let classifier = StabilityClassifier::default();
        let assessment = classifier.assess(&fit_ar2(&[1.0, 2.0, 3.0]));
        assert_eq!(assessment.grade, FitGrade::Degenerate);
        assert_eq!(assessment.zone, StabilityZone::FastDecay);
    }

    #[test]
    fn test_assess_raw_and_display_modulus() {
        let series: Vec<f64> = (0..48)
            .map(|t| (std::f64::consts::TAU * t as f64 / 6.0).sin())
            .collect();
        let classifier = StabilityClassifier::default();
        let assessment = classifier.assess(&fit_ar2(&series));
        assert!(assessment.raw_modulus > 0.999);
        assert_eq!(assessment.display_modulus, 0.99);
        // Decisions use the raw value
        assert!(assessment.zone >= StabilityZone::NearCritical);
        assert_eq!(assessment.grade, FitGrade::Good);
        assert!(!assessment.is_trustworthy_persistence());
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let grades = FitGradeThresholds {
            good: 0.2,
            poor: 0.5,
            ..FitGradeThresholds::default()
        };
        assert!(StabilityClassifier::new(ZoneBoundaries::default(), grades).is_err());
    }
}
