//! Ljung–Box portmanteau test for residual autocorrelation

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LjungBox {
    /// `Q = n(n+2) Σ ρ_k² / (n-k)`
    pub statistic: f64,
    pub lags: usize,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
}

impl LjungBox {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Default lag count `min(10, n/5)`, at least 1
pub fn default_lags(n: usize) -> usize {
    (n / 5).clamp(1, 10)
}

/// Ljung–Box test on `residuals` over `lags` autocorrelations
///
/// Degrees of freedom are `lags - fitted_parameters`, at least 1. Returns
/// `None` when there are not more observations than lags or the
/// residuals have no spread.
pub fn ljung_box(residuals: &[f64], lags: usize, fitted_parameters: usize) -> Option<LjungBox> {
    let n = residuals.len();
    if lags == 0 || n <= lags {
        return None;
    }
    let mean = residuals.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = residuals.iter().map(|r| r - mean).collect();
    let denominator: f64 = centered.iter().map(|r| r * r).sum();
    if !(denominator > 0.0) {
        return None;
    }

    let nf = n as f64;
    let statistic = (1..=lags)
        .map(|k| {
            let rho = centered[k..]
                .iter()
                .zip(&centered)
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / denominator;
            rho * rho / (nf - k as f64)
        })
        .sum::<f64>()
        * nf
        * (nf + 2.0);

    let degrees_of_freedom = lags.saturating_sub(fitted_parameters).max(1);
    let p_value = ChiSquared::new(degrees_of_freedom as f64)
        .map(|dist| (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0))
        .unwrap_or(1.0);
    Some(LjungBox {
        statistic,
        lags,
        degrees_of_freedom,
        p_value,
    })
}
