//! Moving-block bootstrap of the AR eigenvalue modulus
//!
//! The series is resampled in contiguous blocks so short-range
//! autocorrelation survives inside each block, the AR model is refitted to
//! every replicate, and the distribution of refitted moduli is turned into
//! an interval by a [`BootstrapMethod`].

use crate::{
    bootstrap_methods::{BootstrapMethod, MedianCenteredBootstrap, PercentileBootstrap},
    resample::{block_resample, default_block_length},
    BootstrapPercentiles, ConfidenceInterval,
};
use par_ar::{ArFitter, ArOrder, FitMethod};
use par_core::{math, EngineConfig, Error, Mulberry32, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Outcome of a block bootstrap on one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EigenvalueBootstrap {
    /// Modulus fitted on the original series
    pub estimate: f64,
    /// Interval from the configured [`BootstrapMethod`], named by `method`
    pub method_interval: ConfidenceInterval,
    /// Plain percentile interval at the same level; 2.5/97.5 at 95%
    pub percentile_interval: ConfidenceInterval,
    pub percentiles: BootstrapPercentiles,
    /// Standard deviation of the bootstrap moduli
    pub standard_error: f64,
    pub block_length: usize,
    /// Resamples requested
    pub iterations: usize,
    /// Resamples whose refit was not computable; excluded from the interval
    pub failed_resamples: usize,
    pub method: String,
    #[serde(skip)]
    pub estimates: Vec<f64>,
}

/// Block bootstrap engine
#[derive(Debug, Clone)]
pub struct BlockBootstrap<M = MedianCenteredBootstrap> {
    method: M,
    iterations: usize,
    block_length: Option<usize>,
    confidence_level: f64,
    seed: u32,
    order: ArOrder,
    fitter: ArFitter,
}

impl Default for BlockBootstrap<MedianCenteredBootstrap> {
    fn default() -> Self {
        Self::new(MedianCenteredBootstrap)
    }
}

impl BlockBootstrap<MedianCenteredBootstrap> {
    /// Default method with iterations, block length, level and seed from `config`
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let bootstrap = Self::default()
            .with_iterations(config.resampling.bootstrap_iterations)
            .with_confidence_level(config.resampling.confidence_level)
            .with_seed(config.seed);
        let bootstrap = match config.resampling.block_length {
            Some(length) => bootstrap.with_block_length(length),
            None => bootstrap,
        };
        bootstrap.validate()?;
        Ok(bootstrap)
    }
}

impl<M: BootstrapMethod> BlockBootstrap<M> {
    pub fn new(method: M) -> Self {
        Self {
            method,
            iterations: 400,
            block_length: None,
            confidence_level: 0.95,
            seed: 42,
            order: ArOrder::Two,
            fitter: ArFitter::new(),
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Fixed block length instead of `round(n^(1/3))`
    pub fn with_block_length(mut self, length: usize) -> Self {
        self.block_length = Some(length);
        self
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_order(mut self, order: ArOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_fit_method(mut self, method: FitMethod) -> Self {
        self.fitter = self.fitter.with_method(method);
        self
    }

    pub fn method(&self) -> &M {
        &self.method
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::invalid_config("bootstrap iterations", "must be positive"));
        }
        if self.block_length == Some(0) {
            return Err(Error::invalid_config("bootstrap block length", "must be positive"));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::invalid_config(
                "bootstrap confidence level",
                format!("must be in (0, 1), got {}", self.confidence_level),
            ));
        }
        Ok(())
    }

    /// Bootstrap interval for the dominant-root modulus of `series`
    ///
    /// Fails with `InsufficientData` when the original series is too short
    /// to fit, and with `NumericalDegeneracy` when the original fit or every
    /// refit is not computable.
    #[instrument(skip(self, series), fields(n = series.len(), iterations = self.iterations, method = self.method.name()))]
    pub fn eigenvalue_interval(&self, series: &[f64]) -> Result<EigenvalueBootstrap> {
        self.validate()?;
        let n = series.len();
        Error::check_length(n, self.order.min_length())?;

        let original = self.fitter.fit(series, self.order);
        if !original.is_ok() {
            return Err(Error::NumericalDegeneracy(format!(
                "original fit {}",
                original.status
            )));
        }

        let block_length = self.block_length.unwrap_or_else(|| default_block_length(n));
        let mut rng = Mulberry32::new(self.seed);
        let mut estimates = Vec::with_capacity(self.iterations);
        for _ in 0..self.iterations {
            let replicate = block_resample(series, block_length, &mut rng)?;
            let fit = self.fitter.fit(&replicate, self.order);
            if fit.is_ok() {
                estimates.push(fit.eigenvalue_modulus);
            }
        }

        let failed_resamples = self.iterations - estimates.len();
        if estimates.is_empty() {
            return Err(Error::NumericalDegeneracy(
                "no bootstrap resample produced a computable fit".to_string(),
            ));
        }
        if failed_resamples > 0 {
            warn!(failed_resamples, "bootstrap resamples with non-computable fits were skipped");
        }

        let method_interval = self.method.calculate_interval(
            &estimates,
            original.eigenvalue_modulus,
            self.confidence_level,
        )?;
        let percentile_interval = PercentileBootstrap.calculate_interval(
            &estimates,
            original.eigenvalue_modulus,
            self.confidence_level,
        )?;
        let percentiles = BootstrapPercentiles::from_sorted(&math::sorted(&estimates));
        let standard_error = if estimates.len() > 1 {
            math::sample_std_dev(&estimates)
        } else {
            0.0
        };
        debug!(
            estimate = original.eigenvalue_modulus,
            lower = method_interval.lower,
            upper = method_interval.upper,
            block_length,
            "bootstrap interval computed"
        );

        Ok(EigenvalueBootstrap {
            estimate: original.eigenvalue_modulus,
            method_interval,
            percentile_interval,
            percentiles,
            standard_error,
            block_length,
            iterations: self.iterations,
            failed_resamples,
            method: self.method.name().to_string(),
            estimates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use par_core::RandomSource;

    fn ar2_series(r: f64, n: usize, seed: u32) -> Vec<f64> {
        let phi1 = 2.0 * r * (std::f64::consts::PI / 3.0).cos();
        let phi2 = -r * r;
        let mut rng = Mulberry32::new(seed);
        let mut x = vec![0.0, 0.0];
        for _ in 0..n + 100 {
            let next = phi1 * x[x.len() - 1] + phi2 * x[x.len() - 2] + rng.next_gaussian();
            x.push(next);
        }
        x.split_off(102)
    }

    #[test]
    fn test_interval_shape() {
        let series = ar2_series(0.7, 120, 11);
        let result = BlockBootstrap::default()
            .with_iterations(100)
            .eigenvalue_interval(&series)
            .unwrap();
        assert_eq!(result.block_length, 5);
        assert_eq!(result.iterations, 100);
        assert_eq!(result.estimates.len() + result.failed_resamples, 100);
        assert!(result.method_interval.lower <= result.method_interval.upper);
        assert!(result.method_interval.contains(result.estimate));
        assert!(result.percentiles.p025 <= result.percentiles.p50);
        assert!(result.percentiles.p50 <= result.percentiles.p975);
        assert!(result.standard_error > 0.0);
        assert_eq!(result.method, "Median-Centred Bootstrap");
    }

    #[test]
    fn test_seeded_runs_identical() {
        let series = ar2_series(0.6, 80, 3);
        let a = BlockBootstrap::default().with_iterations(50).with_seed(9);
        let first = a.eigenvalue_interval(&series).unwrap();
        let second = a.eigenvalue_interval(&series).unwrap();
        assert_eq!(first.method_interval.lower.to_bits(), second.method_interval.lower.to_bits());
        assert_eq!(first.method_interval.upper.to_bits(), second.method_interval.upper.to_bits());
        assert_eq!(first.estimates, second.estimates);
    }

    #[test]
    fn test_custom_method_and_block_length() {
        let series = ar2_series(0.6, 80, 5);
        let result = BlockBootstrap::new(PercentileBootstrap)
            .with_iterations(40)
            .with_block_length(8)
            .eigenvalue_interval(&series)
            .unwrap();
        assert_eq!(result.block_length, 8);
        assert_eq!(result.method, "Percentile Bootstrap");
        assert_eq!(result.method_interval, result.percentile_interval);
        assert_eq!(result.method_interval.lower, math::percentile(&result.estimates, 0.025));
    }

    #[test]
    fn test_percentile_interval_matches_reported_percentiles() {
        let series = ar2_series(0.6, 80, 13);
        let result = BlockBootstrap::default()
            .with_iterations(60)
            .eigenvalue_interval(&series)
            .unwrap();
        assert_relative_eq!(result.percentile_interval.lower, result.percentiles.p025, epsilon = 1e-12);
        assert_relative_eq!(result.percentile_interval.upper, result.percentiles.p975, epsilon = 1e-12);
        assert_eq!(result.percentile_interval.estimate, result.estimate);

        let median = result.percentiles.p50;
        let shift = result.estimate - median;
        assert_relative_eq!(
            result.method_interval.lower,
            result.percentile_interval.lower + shift,
            epsilon = 1e-12
        );

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("methodInterval").is_some());
        assert!(json.get("percentileInterval").is_some());
        assert!(json.get("interval").is_none());
    }

    #[test]
    fn test_short_series_rejected() {
        let err = BlockBootstrap::default().eigenvalue_interval(&[1.0, 2.0, 1.5]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { .. }));
    }

    #[test]
    fn test_constant_series_degenerate() {
        let err = BlockBootstrap::default().eigenvalue_interval(&[3.0; 30]).unwrap_err();
        assert!(matches!(err, Error::NumericalDegeneracy(_)));
    }

    #[test]
    fn test_invalid_settings() {
        let series = ar2_series(0.5, 40, 1);
        assert!(BlockBootstrap::default().with_iterations(0).eigenvalue_interval(&series).is_err());
        assert!(BlockBootstrap::default().with_confidence_level(1.0).eigenvalue_interval(&series).is_err());
        assert!(BlockBootstrap::default().with_block_length(0).validate().is_err());
    }

    #[test]
    fn test_from_config() {
        let mut config = EngineConfig::default().with_seed(17);
        config.resampling.block_length = Some(6);
        config.resampling.bootstrap_iterations = 30;
        let bootstrap = BlockBootstrap::from_config(&config).unwrap();
        let result = bootstrap.eigenvalue_interval(&ar2_series(0.6, 60, 2)).unwrap();
        assert_eq!(result.block_length, 6);
        assert_eq!(result.iterations, 30);
    }
}
