//! Bootstrap method implementations
//!
//! Each method turns a bootstrap distribution and the original estimate
//! into an interval. Percentiles use linear interpolation.

use crate::ConfidenceInterval;
use par_core::{math, Error, Result};
use tracing::debug;

/// Rule for building a confidence interval from bootstrap estimates
pub trait BootstrapMethod: Clone + Send + Sync {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval>;

    fn name(&self) -> &'static str;
}

fn tail_quantiles(bootstrap_estimates: &[f64], confidence_level: f64) -> Result<(f64, f64, Vec<f64>)> {
    if bootstrap_estimates.is_empty() {
        return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
    }
    let sorted = math::sorted(bootstrap_estimates);
    let alpha = 1.0 - confidence_level;
    let lower = math::percentile_sorted(&sorted, alpha / 2.0);
    let upper = math::percentile_sorted(&sorted, 1.0 - alpha / 2.0);
    Ok((lower, upper, sorted))
}

/// Percentile bootstrap
///
/// The empirical tail percentiles taken as-is. Biased whenever the
/// estimator is, which for persistence near the unit circle is always.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        let (lower, upper, _) = tail_quantiles(bootstrap_estimates, confidence_level)?;
        Ok(ConfidenceInterval::new(lower, upper, original_estimate, confidence_level))
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}

/// Basic bootstrap
///
/// Reflection about the original estimate: `[2θ̂ - q_hi, 2θ̂ - q_lo]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicBootstrap;

impl BootstrapMethod for BasicBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        let (lo, hi, _) = tail_quantiles(bootstrap_estimates, confidence_level)?;
        Ok(ConfidenceInterval::new(
            2.0 * original_estimate - hi,
            2.0 * original_estimate - lo,
            original_estimate,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "Basic Bootstrap"
    }
}

/// Median-centred percentile bootstrap
///
/// The percentile interval shifted by `θ̂ - median(θ*)`. Block resampling
/// breaks dependence at block joins, so the bootstrap distribution of the
/// modulus sits below the estimate; the shift removes that offset while
/// keeping the percentile spread.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCenteredBootstrap;

impl BootstrapMethod for MedianCenteredBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        let (lower, upper, sorted) = tail_quantiles(bootstrap_estimates, confidence_level)?;
        let shift = original_estimate - math::percentile_sorted(&sorted, 0.5);
        debug!(shift, "median-centred bootstrap shift");
        Ok(ConfidenceInterval::new(
            lower + shift,
            upper + shift,
            original_estimate,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "Median-Centred Bootstrap"
    }
}
