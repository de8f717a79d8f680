//! Clock-gated AR(2) coupling
//!
//! The coupled model adds the lagged clock signal to the target's AR(2):
//!
//! `y_t = φ1 y_{t-1} + φ2 y_{t-2} + β c_{t-1} + ε_t`
//!
//! and the nested F-test asks whether `β` explains variance the target's own
//! history does not.

use crate::fit::{fit_ar2, ArFit};
use crate::linalg;
use crate::selection::{nested_f_test, FTestResult};
use nalgebra::{DMatrix, DVector};
use par_core::{math, Error, Result};
use serde::{Deserialize, Serialize};

/// Shortest pair of series the coupled model can be tested on
pub const MIN_COUPLING_LENGTH: usize = 6;

/// Outcome of testing one (target, clock) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouplingResult {
    /// Target-only AR(2)
    pub reduced: ArFit,
    /// `[φ1, φ2, β]`
    pub coefficients: Vec<f64>,
    pub clock_coefficient: f64,
    pub r_squared: f64,
    pub test: FTestResult,
}

/// Test whether the lagged clock series improves the target's AR(2)
pub fn coupling_test(target: &[f64], clock: &[f64]) -> Result<CouplingResult> {
    if target.len() != clock.len() {
        return Err(Error::size_mismatch(target.len(), clock.len(), "clock series"));
    }
    Error::check_length(target.len(), MIN_COUPLING_LENGTH)?;
    if clock.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite("clock series"));
    }

    let reduced = fit_ar2(target);
    if !reduced.is_ok() {
        return Err(Error::NumericalDegeneracy(format!("target AR(2): {}", reduced.status)));
    }

    let n = target.len();
    let start = 2;
    let t_obs = n - start;
    let target_mean = math::mean(target);
    let clock_mean = math::mean(clock);
    let y_c: Vec<f64> = target.iter().map(|v| v - target_mean).collect();
    let z_c: Vec<f64> = clock.iter().map(|v| v - clock_mean).collect();

    let x = DMatrix::from_fn(t_obs, 3, |r, k| {
        let t = start + r;
        match k {
            0 => y_c[t - 1],
            1 => y_c[t - 2],
            _ => z_c[t - 1],
        }
    });
    let y = DVector::from_fn(t_obs, |r, _| y_c[start + r]);
    let coefficients = linalg::least_squares(&x, &y).ok_or_else(|| {
        Error::NumericalDegeneracy("singular coupled design (clock collinear with target lags)".to_string())
    })?;

    let beta = DVector::from_column_slice(&coefficients);
    let full_residuals: Vec<f64> = (&y - &x * &beta).iter().copied().collect();
    let ssr: f64 = full_residuals.iter().map(|e| e * e).sum();
    let r_squared = 1.0 - ssr / y.norm_squared();

    let test = nested_f_test(&reduced.residuals, &full_residuals, t_obs - 2, t_obs - 3)?;

    Ok(CouplingResult {
        reduced,
        clock_coefficient: coefficients[2],
        coefficients,
        r_squared,
        test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use par_core::{Mulberry32, RandomSource};
    use std::f64::consts::TAU;

    fn clock_wave(n: usize) -> Vec<f64> {
        (0..n).map(|t| (TAU * t as f64 / 12.0).sin()).collect()
    }

    #[test]
    fn test_driven_target_is_detected() {
        let n = 96;
        let clock = clock_wave(n);
        let mut rng = Mulberry32::new(5);
        let mut target = vec![0.0, 0.0];
        for t in 2..n {
            let v = 0.5 * target[t - 1] - 0.2 * target[t - 2] + 0.8 * clock[t - 1] + 0.1 * rng.next_gaussian();
            target.push(v);
        }
        let result = coupling_test(&target, &clock).unwrap();
        assert!(result.test.p_value < 1e-6, "{:?}", result.test);
        assert!((result.clock_coefficient - 0.8).abs() < 0.1);
        assert!(result.r_squared >= result.reduced.r_squared);
    }

    #[test]
    fn test_unrelated_target_is_not_significant() {
        let n = 96;
        let clock = clock_wave(n);
        let mut rng = Mulberry32::new(9);
        let target: Vec<f64> = (0..n).map(|_| rng.next_gaussian()).collect();
        let result = coupling_test(&target, &clock).unwrap();
        assert!(result.test.p_value > 0.001);
        assert_eq!(result.test.df_numerator, 1);
        assert_eq!(result.test.df_denominator, n - 2 - 3);
    }

    #[test]
    fn test_length_mismatch() {
        let err = coupling_test(&[1.0; 10], &[1.0; 9]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_too_short() {
        let err = coupling_test(&[1.0, 2.0, 3.0, 1.0, 0.0], &[0.0, 1.0, 0.0, 1.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { expected: 6, actual: 5 }));
    }
}
