//! Order comparison and nested-model tests

use crate::fit::{ArFit, ArFitter, ArOrder};
use par_core::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tracing::debug;

/// First response index shared by all orders in a comparison
pub const COMMON_WINDOW_START: usize = 3;

/// AR(1), AR(2) and AR(3) fitted on the same observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderComparison {
    pub ar1: ArFit,
    pub ar2: ArFit,
    pub ar3: ArFit,
    /// `None` when no order could be fitted
    pub best_by_aic: Option<ArOrder>,
    pub best_by_bic: Option<ArOrder>,
    pub best_by_aicc: Option<ArOrder>,
    pub common_start: usize,
}

impl OrderComparison {
    pub fn fit(&self, order: ArOrder) -> &ArFit {
        match order {
            ArOrder::One => &self.ar1,
            ArOrder::Two => &self.ar2,
            ArOrder::Three => &self.ar3,
        }
    }

    /// AIC improvement of `higher` over `lower` (positive favours `higher`)
    ///
    /// `None` unless both fits are usable.
    pub fn aic_improvement(&self, lower: ArOrder, higher: ArOrder) -> Option<f64> {
        let (lo, hi) = (self.fit(lower), self.fit(higher));
        (lo.is_ok() && hi.is_ok()).then(|| lo.aic - hi.aic)
    }

    /// R² gain of `higher` over `lower`
    pub fn r_squared_gain(&self, lower: ArOrder, higher: ArOrder) -> Option<f64> {
        let (lo, hi) = (self.fit(lower), self.fit(higher));
        (lo.is_ok() && hi.is_ok()).then(|| hi.r_squared - lo.r_squared)
    }

    /// Nested F-test of `higher` against `lower`
    pub fn f_test(&self, lower: ArOrder, higher: ArOrder) -> Result<FTestResult> {
        let (lo, hi) = (self.fit(lower), self.fit(higher));
        if !lo.is_ok() || !hi.is_ok() {
            return Err(Error::NumericalDegeneracy(format!(
                "cannot compare {lower} and {higher}: {} / {}",
                lo.status, hi.status
            )));
        }
        let n = lo.effective_observations;
        nested_f_test(
            &lo.residuals,
            &hi.residuals,
            n - lower.lags(),
            n - higher.lags(),
        )
    }
}

fn best_by(fits: [&ArFit; 3], criterion: impl Fn(&ArFit) -> f64) -> Option<ArOrder> {
    fits.into_iter()
        .filter(|f| f.is_ok() && criterion(*f).is_finite())
        .min_by(|a, b| criterion(*a).total_cmp(&criterion(*b)))
        .map(|f| f.order)
}

/// Fit AR(1), AR(2), AR(3) on a common window and rank them
pub fn compare_orders(series: &[f64]) -> OrderComparison {
    let fitter = ArFitter::new().with_window_start(COMMON_WINDOW_START);
    let ar1 = fitter.fit(series, ArOrder::One);
    let ar2 = fitter.fit(series, ArOrder::Two);
    let ar3 = fitter.fit(series, ArOrder::Three);
    let fits = [&ar1, &ar2, &ar3];
    let best_by_aic = best_by(fits, |f| f.aic);
    let best_by_bic = best_by(fits, |f| f.bic);
    let best_by_aicc = best_by(fits, |f| f.aicc);
    debug!(
        n = series.len(),
        ?best_by_aic,
        ?best_by_bic,
        "compared AR orders on common window"
    );
    OrderComparison {
        ar1,
        ar2,
        ar3,
        best_by_aic,
        best_by_bic,
        best_by_aicc,
        common_start: COMMON_WINDOW_START,
    }
}

/// Result of a nested-model F-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FTestResult {
    #[serde(deserialize_with = "par_core::float::unbounded")]
    pub f_statistic: f64,
    pub p_value: f64,
    pub df_numerator: usize,
    pub df_denominator: usize,
}

impl FTestResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// F-test of a full model against a reduced model nested inside it
///
/// `F = ((SSR_r − SSR_f) / (df_r − df_f)) / (SSR_f / df_f)` with residual
/// degrees of freedom `df_r > df_f > 0`. The p-value is the upper tail of
/// the Fisher–Snedecor distribution.
pub fn nested_f_test(
    reduced_residuals: &[f64],
    full_residuals: &[f64],
    df_reduced: usize,
    df_full: usize,
) -> Result<FTestResult> {
    if df_full == 0 || df_reduced <= df_full {
        return Err(Error::InvalidInput(format!(
            "nested F-test needs df_reduced > df_full > 0, got {df_reduced} and {df_full}"
        )));
    }
    let ssr_reduced: f64 = reduced_residuals.iter().map(|e| e * e).sum();
    let ssr_full: f64 = full_residuals.iter().map(|e| e * e).sum();
    if !ssr_reduced.is_finite() || !ssr_full.is_finite() {
        return Err(Error::non_finite("residuals"));
    }
    let df_numerator = df_reduced - df_full;

    let (f_statistic, p_value) = if ssr_full <= 0.0 {
        if ssr_reduced > 0.0 {
            (f64::INFINITY, 0.0)
        } else {
            (0.0, 1.0)
        }
    } else {
        let f = (((ssr_reduced - ssr_full) / df_numerator as f64) / (ssr_full / df_full as f64)).max(0.0);
        let dist = FisherSnedecor::new(df_numerator as f64, df_full as f64)
            .map_err(|e| Error::NumericalDegeneracy(format!("F distribution: {e}")))?;
        (f, (1.0 - dist.cdf(f)).clamp(0.0, 1.0))
    };

    Ok(FTestResult {
        f_statistic,
        p_value,
        df_numerator,
        df_denominator: df_full,
    })
}
