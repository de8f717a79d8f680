use par_ar::fit_ar2;
use par_falsify::fixtures::{sampled_sinusoid, simulate_ar2, uniform_noise};
use par_falsify::{
    standard_fixtures, CalibrationVerdict, FalsificationHarness, FalsificationOracle, FalsificationReport,
};
use par_stability::{FitGrade, StabilityClassifier};
use std::f64::consts::PI;

#[test]
fn uniform_noise_fit_is_not_good() {
    let fit = fit_ar2(&uniform_noise(48, 1));
    let grade = StabilityClassifier::default().assess(&fit).grade;
    assert!(matches!(grade, FitGrade::Poor | FitGrade::Degenerate), "{grade}");
}

#[test]
fn undersampled_sinusoid_has_near_unit_modulus() {
    let fit = fit_ar2(&sampled_sinusoid(48, 4.0, 24.0));
    assert!(fit.is_ok());
    assert!(fit.eigenvalue_modulus > 0.95, "{}", fit.eigenvalue_modulus);
}

#[test]
fn known_ar2_modulus_is_recovered() {
    let fit = fit_ar2(&simulate_ar2(0.537, PI / 3.0, 5000, 0.01, 1));
    assert!((fit.eigenvalue_modulus - 0.537).abs() < 0.05, "{}", fit.eigenvalue_modulus);
    assert!(fit.is_complex_root);
}

#[test]
fn standard_panel_is_calibrated() {
    let report = FalsificationHarness::standard().run_to_completion();
    for verdict in &report.verdicts {
        assert!(verdict.upheld, "{} ({}): {}", verdict.fixture, verdict.class, verdict.reason);
    }
    assert_eq!(report.verdict, CalibrationVerdict::Calibrated);
    assert_eq!(report.verdicts.len(), standard_fixtures().len());
}

#[test]
fn adversarial_fixture_uses_raw_modulus() {
    let report = FalsificationHarness::standard().run_to_completion();
    let adversarial = report
        .verdicts
        .iter()
        .find(|v| v.class == "ADVERSARIAL")
        .unwrap();
    // The display ceiling would hide this
    assert!(adversarial.raw_modulus > 0.93);
}

#[test]
fn report_serialises_with_class_names() {
    let harness = FalsificationHarness::new(FalsificationOracle::default(), standard_fixtures()[..2].to_vec());
    let report = harness.run_to_completion();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"verdict\":\"CALIBRATED\""));
    assert!(json.contains("\"class\":\"NONSENSE\""));
    let back: FalsificationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.verdicts.len(), 2);
    assert_eq!(back.verdict, report.verdict);
}
