//! Linear trend screen

use par_core::math;
use serde::{Deserialize, Serialize};

/// Ordinary least-squares line through `(t, x_t)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearTrend {
    /// Change per sample
    pub slope: f64,
    pub intercept: f64,
    /// `|slope| · n / sd`: total drift over the series in units of its SD
    pub normalized_slope: f64,
}

/// Fit a line against the sample index; `None` below three points or for
/// a constant series
pub fn linear_trend(values: &[f64]) -> Option<LinearTrend> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let sd = math::sample_std_dev(values);
    if !(sd > 0.0) {
        return None;
    }
    let t_mean = (n - 1) as f64 / 2.0;
    let x_mean = math::mean(values);
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (t, &x) in values.iter().enumerate() {
        let dt = t as f64 - t_mean;
        sxy += dt * (x - x_mean);
        sxx += dt * dt;
    }
    let slope = sxy / sxx;
    Some(LinearTrend {
        slope,
        intercept: x_mean - slope * t_mean,
        normalized_slope: slope.abs() * n as f64 / sd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let values: Vec<f64> = (0..10).map(|t| 3.0 + 0.5 * t as f64).collect();
        let trend = linear_trend(&values).unwrap();
        assert_relative_eq!(trend.slope, 0.5, epsilon = 1e-12);
        assert_relative_eq!(trend.intercept, 3.0, epsilon = 1e-12);
        // sd of 0.5·t over 10 points is 0.5·sqrt(55/6)
        assert_relative_eq!(trend.normalized_slope, 10.0 / (55.0f64 / 6.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_oscillation_has_small_trend() {
        let values: Vec<f64> = (0..48)
            .map(|t| (std::f64::consts::TAU * t as f64 / 12.0).sin())
            .collect();
        assert!(linear_trend(&values).unwrap().normalized_slope < 1.0);
    }

    #[test]
    fn test_degenerate() {
        assert!(linear_trend(&[1.0, 2.0]).is_none());
        assert!(linear_trend(&[5.0; 8]).is_none());
    }
}
