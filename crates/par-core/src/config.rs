//! Engine configuration
//!
//! Every threshold, iteration count and tolerance used by the engine lives in
//! [`EngineConfig`]. Components receive it (or one of its sections) at
//! construction and validate it before any computation starts.
//!
//! All sections deserialize with per-field defaults, so a caller can override
//! any subset:
//!
//! ```rust
//! use par_core::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "seed": 7, "resampling": { "permutations": 99 } }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.resampling.permutations, 99);
//! assert_eq!(config.resampling.bootstrap_iterations, 400);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upper edges of the persistence zones over `[0, ∞)`
///
/// `FastDecay < fast_decay_upper <= Target < target_upper <= Clock < clock_upper
/// <= NearCritical < explosive_lower <= Explosive`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoneBoundaries {
    pub fast_decay_upper: f64,
    pub target_upper: f64,
    pub clock_upper: f64,
    pub explosive_lower: f64,
}

impl Default for ZoneBoundaries {
    fn default() -> Self {
        Self {
            fast_decay_upper: 0.40,
            target_upper: 0.60,
            clock_upper: 0.80,
            explosive_lower: 1.0,
        }
    }
}

impl ZoneBoundaries {
    /// Narrower stable band (0.45 to 0.75) used by validation harnesses
    pub fn narrow_stable_band() -> Self {
        Self {
            fast_decay_upper: 0.45,
            target_upper: 0.60,
            clock_upper: 0.75,
            explosive_lower: 1.0,
        }
    }

    /// Cutoffs used when comparing against mechanistic oscillator simulations
    pub fn simulator_bridge() -> Self {
        Self {
            fast_decay_upper: 0.55,
            target_upper: 0.70,
            clock_upper: 0.95,
            explosive_lower: 1.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let edges = [
            self.fast_decay_upper,
            self.target_upper,
            self.clock_upper,
            self.explosive_lower,
        ];
        if edges.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(Error::invalid_config(
                "zones",
                "boundaries must be finite and positive",
            ));
        }
        if edges.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::invalid_config(
                "zones",
                format!("boundaries must be non-decreasing, got {edges:?}"),
            ));
        }
        Ok(())
    }
}

/// R² cut points for fit grades: `> good` is Good, `> poor` is Poor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FitGradeThresholds {
    pub good: f64,
    pub poor: f64,
    /// Shorter series are never graded above Degenerate
    pub min_samples: usize,
}

impl Default for FitGradeThresholds {
    fn default() -> Self {
        Self {
            good: 0.7,
            poor: 0.3,
            min_samples: 5,
        }
    }
}

impl FitGradeThresholds {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.poor) || !(0.0..=1.0).contains(&self.good) {
            return Err(Error::invalid_config("fitGrades", "thresholds must lie in [0, 1]"));
        }
        if self.poor > self.good {
            return Err(Error::invalid_config(
                "fitGrades",
                format!("poor ({}) must not exceed good ({})", self.poor, self.good),
            ));
        }
        Ok(())
    }
}

/// Trigger thresholds for the diagnostic screens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagnosticThresholds {
    /// Normalised trend slope (|slope|·n / sd) above which a trend is flagged
    pub trend_slope: f64,
    /// Trend is only critical when the eigenvalue also exceeds this
    pub trend_eigenvalue: f64,
    pub sample_size_warning: usize,
    pub sample_size_critical: usize,
    /// AIC(AR2) − AIC(AR3) above this favours the higher order
    pub delta_aic: f64,
    pub delta_r_squared: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
    pub boundary_lower: f64,
    pub boundary_upper: f64,
    /// Ljung–Box lag count; `None` uses `min(10, n / 5)`
    pub ljung_box_lags: Option<usize>,
}

impl Default for DiagnosticThresholds {
    fn default() -> Self {
        Self {
            trend_slope: 3.0,
            trend_eigenvalue: 0.9,
            sample_size_warning: 50,
            sample_size_critical: 12,
            delta_aic: 2.0,
            delta_r_squared: 0.02,
            skewness: 1.0,
            excess_kurtosis: 3.0,
            boundary_lower: 0.93,
            boundary_upper: 1.07,
            ljung_box_lags: None,
        }
    }
}

impl DiagnosticThresholds {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("diagnostics.trendSlope", self.trend_slope),
            ("diagnostics.trendEigenvalue", self.trend_eigenvalue),
            ("diagnostics.skewness", self.skewness),
            ("diagnostics.excessKurtosis", self.excess_kurtosis),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_config(field, format!("must be positive, got {value}")));
            }
        }
        if !self.delta_aic.is_finite() || !self.delta_r_squared.is_finite() {
            return Err(Error::invalid_config("diagnostics", "order-comparison deltas must be finite"));
        }
        if self.sample_size_critical > self.sample_size_warning {
            return Err(Error::invalid_config(
                "diagnostics.sampleSizeCritical",
                "must not exceed sampleSizeWarning",
            ));
        }
        if !(self.boundary_lower < self.boundary_upper) {
            return Err(Error::invalid_config(
                "diagnostics.boundaryLower",
                "must be below boundaryUpper",
            ));
        }
        if self.ljung_box_lags == Some(0) {
            return Err(Error::invalid_config("diagnostics.ljungBoxLags", "must be positive"));
        }
        Ok(())
    }
}

/// Iteration counts for permutation, random-draw and bootstrap procedures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResamplingConfig {
    pub permutations: usize,
    pub gene_set_draws: usize,
    pub matched_draws: usize,
    pub fairness_iterations: usize,
    pub bootstrap_iterations: usize,
    /// Bootstrap block length; `None` uses `round(n^(1/3))`
    pub block_length: Option<usize>,
    pub confidence_level: f64,
}

impl Default for ResamplingConfig {
    fn default() -> Self {
        Self {
            permutations: 500,
            gene_set_draws: 1000,
            matched_draws: 1000,
            fairness_iterations: 200,
            bootstrap_iterations: 400,
            block_length: None,
            confidence_level: 0.95,
        }
    }
}

impl ResamplingConfig {
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("resampling.permutations", self.permutations),
            ("resampling.geneSetDraws", self.gene_set_draws),
            ("resampling.matchedDraws", self.matched_draws),
            ("resampling.fairnessIterations", self.fairness_iterations),
            ("resampling.bootstrapIterations", self.bootstrap_iterations),
        ];
        for (field, count) in counts {
            if count == 0 {
                return Err(Error::invalid_config(field, "must be positive"));
            }
        }
        if self.block_length == Some(0) {
            return Err(Error::invalid_config("resampling.blockLength", "must be positive"));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::invalid_config(
                "resampling.confidenceLevel",
                format!("must be in (0, 1), got {}", self.confidence_level),
            ));
        }
        Ok(())
    }
}

/// Relative tolerances for expression/variance-matched background pools
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchingTolerance {
    pub expression: f64,
    pub variance: f64,
}

impl Default for MatchingTolerance {
    fn default() -> Self {
        Self {
            expression: 0.10,
            variance: 0.20,
        }
    }
}

impl MatchingTolerance {
    pub fn validate(&self) -> Result<()> {
        if !self.expression.is_finite() || self.expression < 0.0 {
            return Err(Error::invalid_config("matching.expression", "must be non-negative"));
        }
        if !self.variance.is_finite() || self.variance < 0.0 {
            return Err(Error::invalid_config("matching.variance", "must be non-negative"));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub zones: ZoneBoundaries,
    pub fit_grades: FitGradeThresholds,
    pub diagnostics: DiagnosticThresholds,
    pub resampling: ResamplingConfig,
    pub matching: MatchingTolerance,
    /// Significance level for all null tests
    pub alpha: f64,
    /// Presentation ceiling for the eigenvalue modulus
    pub display_ceiling: f64,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zones: ZoneBoundaries::default(),
            fit_grades: FitGradeThresholds::default(),
            diagnostics: DiagnosticThresholds::default(),
            resampling: ResamplingConfig::default(),
            matching: MatchingTolerance::default(),
            alpha: 0.05,
            display_ceiling: 0.99,
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_zones(mut self, zones: ZoneBoundaries) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_resampling(mut self, resampling: ResamplingConfig) -> Self {
        self.resampling = resampling;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.zones.validate()?;
        self.fit_grades.validate()?;
        self.diagnostics.validate()?;
        self.resampling.validate()?;
        self.matching.validate()?;
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::invalid_config(
                "alpha",
                format!("must be in (0, 1), got {}", self.alpha),
            ));
        }
        if !self.display_ceiling.is_finite() || self.display_ceiling <= 0.0 {
            return Err(Error::invalid_config("displayCeiling", "must be finite and positive"));
        }
        Ok(())
    }
}
