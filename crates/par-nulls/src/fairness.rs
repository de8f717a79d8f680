//! Cross-condition fairness control
//!
//! A persistence difference between two conditions can be an artifact of
//! one condition having more time points or cleaner measurements. The
//! control degrades the reference condition to the comparison's median
//! length and unexplained-variance ratio, refits, and counts how often the
//! difference keeps its sign.

use crate::types::{NullOutcome, NullTestKind, NullTestResult};
use par_ar::fit_ar2;
use par_core::{math, EngineConfig, Error, GeneSeries, Mulberry32, Result};
use par_resample::{add_noise, downsample};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Largest unexplained-variance fraction the noise match aims for
const MAX_UNEXPLAINED: f64 = 0.99;

/// How much the reference condition is degraded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "level", rename_all = "snake_case")]
pub enum NoiseMatching {
    /// Inject enough noise to reach the comparison's `sqrt(1 - R²)`
    UnexplainedVariance,
    /// Fixed noise SD relative to each series' RMS amplitude
    Fixed(f64),
}

/// Degradation applied to the reference condition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegradationPlan {
    /// Median comparison length every reference series is downsampled to
    pub target_length: usize,
    /// Mean `sqrt(1 - R²)` of the reference fits
    pub reference_noise_ratio: f64,
    /// Mean `sqrt(1 - R²)` of the comparison fits
    pub comparison_noise_ratio: f64,
    /// Noise SD added, relative to RMS amplitude
    pub added_noise_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessReport {
    pub outcome: NullOutcome,
    pub plan: Option<DegradationPlan>,
    /// Fraction of degraded iterations that kept the observed sign
    pub retention_rate: Option<f64>,
    pub persists: bool,
}

impl FairnessReport {
    fn not_computable(reason: &str, plan: Option<DegradationPlan>) -> Self {
        Self {
            outcome: NullOutcome::not_computable(NullTestKind::Fairness, reason),
            plan,
            retention_rate: None,
            persists: false,
        }
    }
}

/// Noise level that lifts the unexplained fraction from `reference` to `comparison`
///
/// Adding independent noise with SD `s·RMS` to a series whose unexplained
/// fraction is `u` gives `(u² + s²) / (1 + s²)`.
pub fn matching_noise_level(reference: f64, comparison: f64) -> f64 {
    let target = (comparison * comparison).min(MAX_UNEXPLAINED);
    let current = reference * reference;
    if target <= current {
        return 0.0;
    }
    ((target - current) / (1.0 - target)).sqrt()
}

struct FittedGroup {
    moduli: Vec<f64>,
    noise_ratio: f64,
}

fn fit_group(genes: &[GeneSeries]) -> Option<FittedGroup> {
    let fits: Vec<_> = genes
        .iter()
        .map(|g| fit_ar2(&g.values))
        .filter(|f| f.is_ok())
        .collect();
    if fits.is_empty() {
        return None;
    }
    let ratios: Vec<f64> = fits.iter().map(|f| (1.0 - f.r_squared).max(0.0).sqrt()).collect();
    Some(FittedGroup {
        moduli: fits.iter().map(|f| f.eigenvalue_modulus).collect(),
        noise_ratio: math::mean(&ratios),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairnessControl {
    iterations: usize,
    noise: NoiseMatching,
    alpha: f64,
    seed: u32,
}

impl FairnessControl {
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            iterations: config.resampling.fairness_iterations,
            noise: NoiseMatching::UnexplainedVariance,
            alpha: config.alpha,
            seed: config.seed,
        })
    }

    pub fn with_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::invalid_config("fairness iterations", "must be positive"));
        }
        self.iterations = iterations;
        Ok(self)
    }

    pub fn with_noise_matching(mut self, noise: NoiseMatching) -> Result<Self> {
        if let NoiseMatching::Fixed(level) = noise {
            if !level.is_finite() || level < 0.0 {
                return Err(Error::invalid_config(
                    "fairness noise level",
                    format!("must be finite and non-negative, got {level}"),
                ));
            }
        }
        self.noise = noise;
        Ok(self)
    }

    /// Check whether `mean|λ|(reference) - mean|λ|(comparison)` survives
    /// degrading the reference condition to the comparison's data quality
    #[instrument(skip(self, reference, comparison), fields(reference = reference.len(), comparison = comparison.len(), iterations = self.iterations))]
    pub fn run(&self, reference: &[GeneSeries], comparison: &[GeneSeries]) -> Result<FairnessReport> {
        for gene in reference.iter().chain(comparison) {
            gene.validate()?;
        }
        let (Some(fitted_reference), Some(fitted_comparison)) = (fit_group(reference), fit_group(comparison)) else {
            return Ok(FairnessReport::not_computable(
                "both conditions need a computable AR(2) fit",
                None,
            ));
        };
        let comparison_mean = math::mean(&fitted_comparison.moduli);
        let observed = math::mean(&fitted_reference.moduli) - comparison_mean;

        let lengths: Vec<f64> = comparison.iter().map(|g| g.len() as f64).collect();
        let added_noise_level = match self.noise {
            NoiseMatching::UnexplainedVariance => {
                matching_noise_level(fitted_reference.noise_ratio, fitted_comparison.noise_ratio)
            }
            NoiseMatching::Fixed(level) => level,
        };
        let plan = DegradationPlan {
            target_length: math::median(&lengths).floor() as usize,
            reference_noise_ratio: fitted_reference.noise_ratio,
            comparison_noise_ratio: fitted_comparison.noise_ratio,
            added_noise_level,
        };
        if observed == 0.0 {
            return Ok(FairnessReport::not_computable(
                "no between-condition difference to test",
                Some(plan),
            ));
        }

        let direction = observed.signum();
        let mut rng = Mulberry32::new(self.seed);
        let mut degraded = Vec::with_capacity(self.iterations);
        for _ in 0..self.iterations {
            let mut moduli = Vec::with_capacity(reference.len());
            for gene in reference {
                let shortened = downsample(&gene.values, plan.target_length, &mut rng);
                let noisy = add_noise(&shortened, plan.added_noise_level, &mut rng)?;
                let fit = fit_ar2(&noisy);
                if fit.is_ok() {
                    moduli.push(fit.eigenvalue_modulus);
                }
            }
            if !moduli.is_empty() {
                degraded.push(math::mean(&moduli) - comparison_mean);
            }
        }
        debug!(observed, draws = degraded.len(), noise = plan.added_noise_level, "fairness control built");
        if degraded.is_empty() {
            return Ok(FairnessReport::not_computable(
                "no degraded reference produced a computable fit",
                Some(plan),
            ));
        }

        let aligned: Vec<f64> = degraded.iter().map(|d| d * direction).collect();
        let flipped = aligned.iter().filter(|&&d| d <= 0.0).count();
        let p_value = (flipped + 1) as f64 / (aligned.len() + 1) as f64;
        let retention_rate = 1.0 - flipped as f64 / aligned.len() as f64;
        let sd = math::sample_std_dev(&aligned);
        let z_score = (aligned.len() > 1 && sd.is_finite() && sd > 0.0).then(|| math::mean(&aligned) / sd);

        let result = NullTestResult::with_p_value(
            NullTestKind::Fairness,
            observed,
            degraded,
            p_value,
            z_score,
            self.alpha,
        );
        let persists = result.significant;
        Ok(FairnessReport {
            outcome: NullOutcome::Computed(result),
            plan: Some(plan),
            retention_rate: Some(retention_rate),
            persists,
        })
    }
}
