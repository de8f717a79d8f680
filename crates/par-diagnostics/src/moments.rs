//! Higher-order moments: skewness and kurtosis
//!
//! Moment-based (non-robust) estimators: residual non-Gaussianity is
//! exactly what the nonlinearity screen is looking for, so outliers must
//! move the estimate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moments {
    pub skewness: f64,
    /// Kurtosis minus 3, zero for a Gaussian
    pub excess_kurtosis: f64,
}

impl Moments {
    /// Sample moments; `None` below four points or for zero spread
    pub fn of(data: &[f64]) -> Option<Self> {
        Some(Self {
            skewness: skewness(data)?,
            excess_kurtosis: excess_kurtosis(data)?,
        })
    }
}

fn central_moments(data: &[f64]) -> Option<(f64, f64, f64)> {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in data {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    let m2 = m2 / n;
    if !(m2 > 0.0) {
        return None;
    }
    Some((m2, m3 / n, m4 / n))
}

/// Moment skewness `m3 / m2^(3/2)`
pub fn skewness(data: &[f64]) -> Option<f64> {
    if data.len() < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(data)?;
    Some(m3 / m2.powf(1.5))
}

/// Excess kurtosis `m4 / m2² - 3`
pub fn excess_kurtosis(data: &[f64]) -> Option<f64> {
    if data.len() < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(data)?;
    Some(m4 / (m2 * m2) - 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_symmetric_data() {
        let data = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_relative_eq!(skewness(&data).unwrap(), 0.0);
        // m2 = 2, m4 = 6.8
        assert_relative_eq!(excess_kurtosis(&data).unwrap(), 6.8 / 4.0 - 3.0);
    }

    #[test]
    fn test_right_skew() {
        let data = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0];
        let moments = Moments::of(&data).unwrap();
        assert!(moments.skewness > 2.5);
        assert!(moments.excess_kurtosis > 3.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(skewness(&[1.0, 2.0]), None);
        assert_eq!(excess_kurtosis(&[1.0, 2.0, 3.0]), None);
        assert_eq!(Moments::of(&[4.0; 10]), None);
    }
}
