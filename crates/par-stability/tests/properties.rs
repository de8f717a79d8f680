//! Property-based tests for classification

use par_core::{FitGradeThresholds, ZoneBoundaries};
use par_stability::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_classify_is_idempotent(modulus in -1.0f64..3.0) {
        let zones = ZoneBoundaries::default();
        prop_assert_eq!(classify(modulus, &zones), classify(modulus, &zones));
    }

    #[test]
    fn prop_classify_is_monotone(a in 0.0f64..2.0, b in 0.0f64..2.0) {
        let zones = ZoneBoundaries::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo, &zones) <= classify(hi, &zones));
    }

    #[test]
    fn prop_grade_is_monotone(a in -0.5f64..1.0, b in -0.5f64..1.0) {
        let thresholds = FitGradeThresholds::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(grade_fit(lo, &thresholds) <= grade_fit(hi, &thresholds));
    }
}

#[test]
fn test_zone_serialization() {
    let json = serde_json::to_string(&StabilityZone::NearCritical).unwrap();
    assert_eq!(json, "\"NEAR_CRITICAL\"");
    let json = serde_json::to_string(&FitGrade::Good).unwrap();
    assert_eq!(json, "\"GOOD\"");
}
