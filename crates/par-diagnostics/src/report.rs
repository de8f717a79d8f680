//! Per-series diagnostic screen

use crate::ljung_box::{default_lags, ljung_box, LjungBox};
use crate::moments::Moments;
use crate::trend::{linear_trend, LinearTrend};
use crate::types::{ConfidenceScore, DiagnosticFlag, DiagnosticKind, Severity};
use par_ar::{compare_orders, fit_ar2, ArFit, ArOrder};
use par_core::{DiagnosticThresholds, EngineConfig, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// AR(3) versus AR(2) on the common comparison window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HigherOrderCheck {
    /// `AIC(AR2) - AIC(AR3)`
    pub aic_improvement: Option<f64>,
    /// `R²(AR3) - R²(AR2)`
    pub r_squared_gain: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsReport {
    pub sample_size: usize,
    /// Raw AR(2) modulus the screens were evaluated against
    pub eigenvalue_modulus: f64,
    pub trend: Option<LinearTrend>,
    pub higher_order: HigherOrderCheck,
    /// Moments of the AR(2) residuals
    pub residual_moments: Option<Moments>,
    pub ljung_box: Option<LjungBox>,
    pub flags: Vec<DiagnosticFlag>,
    pub confidence: ConfidenceScore,
}

impl DiagnosticsReport {
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.flags.iter().any(|f| f.kind == kind)
    }

    /// Most severe flag raised, if any
    pub fn worst_severity(&self) -> Option<Severity> {
        self.flags.iter().map(|f| f.severity).max()
    }

    pub fn severity_of(&self, kind: DiagnosticKind) -> Option<Severity> {
        self.flags.iter().filter(|f| f.kind == kind).map(|f| f.severity).max()
    }
}

/// Diagnostic screen with validated thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    thresholds: DiagnosticThresholds,
    alpha: f64,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            thresholds: DiagnosticThresholds::default(),
            alpha: 0.05,
        }
    }
}

impl Diagnostics {
    pub fn new(thresholds: DiagnosticThresholds, alpha: f64) -> Result<Self> {
        thresholds.validate()?;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(par_core::Error::invalid_config("alpha", format!("must be in (0, 1), got {alpha}")));
        }
        Ok(Self { thresholds, alpha })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.diagnostics, config.alpha)
    }

    pub fn thresholds(&self) -> &DiagnosticThresholds {
        &self.thresholds
    }

    /// Fit AR(2) and screen the series
    pub fn run(&self, series: &[f64]) -> DiagnosticsReport {
        self.run_with_fit(series, &fit_ar2(series))
    }

    /// Screen a series against an AR(2) fit already computed for it
    pub fn run_with_fit(&self, series: &[f64], fit: &ArFit) -> DiagnosticsReport {
        let t = &self.thresholds;
        let n = series.len();
        let modulus = fit.eigenvalue_modulus;
        let mut flags = Vec::new();

        if !fit.is_ok() {
            flags.push(DiagnosticFlag::new(
                DiagnosticKind::FitNotComputable,
                Severity::Critical,
                format!("AR(2) {}", fit.status),
            ));
        }

        if n < t.sample_size_critical {
            flags.push(DiagnosticFlag::new(
                DiagnosticKind::SampleSize,
                Severity::Critical,
                format!("{n} samples, below the minimum of {}", t.sample_size_critical),
            ));
        } else if n < t.sample_size_warning {
            flags.push(DiagnosticFlag::new(
                DiagnosticKind::SampleSize,
                Severity::Warning,
                format!("{n} samples, fewer than the recommended {}", t.sample_size_warning),
            ));
        }

        let trend = linear_trend(series);
        if let Some(trend) = trend {
            if trend.normalized_slope > t.trend_slope && modulus > t.trend_eigenvalue {
                flags.push(DiagnosticFlag::new(
                    DiagnosticKind::Trend,
                    Severity::Critical,
                    format!(
                        "normalised slope {:.2} with |λ| = {modulus:.3}: persistence may reflect drift",
                        trend.normalized_slope
                    ),
                ));
            }
        }

        let comparison = compare_orders(series);
        let higher_order = HigherOrderCheck {
            aic_improvement: comparison.aic_improvement(ArOrder::Two, ArOrder::Three),
            r_squared_gain: comparison.r_squared_gain(ArOrder::Two, ArOrder::Three),
        };
        if let (Some(delta_aic), Some(delta_r2)) = (higher_order.aic_improvement, higher_order.r_squared_gain) {
            if delta_aic > t.delta_aic && delta_r2 > t.delta_r_squared {
                flags.push(DiagnosticFlag::new(
                    DiagnosticKind::HigherOrder,
                    Severity::Warning,
                    format!("AR(3) improves AIC by {delta_aic:.2} and R² by {delta_r2:.3}"),
                ));
            }
        }

        let residual_moments = if fit.is_ok() { Moments::of(&fit.residuals) } else { None };
        if let Some(m) = residual_moments {
            if m.skewness.abs() > t.skewness || m.excess_kurtosis > t.excess_kurtosis {
                flags.push(DiagnosticFlag::new(
                    DiagnosticKind::Nonlinearity,
                    Severity::Warning,
                    format!(
                        "residual skewness {:.2}, excess kurtosis {:.2}",
                        m.skewness, m.excess_kurtosis
                    ),
                ));
            }
        }

        if fit.is_ok() && modulus > t.boundary_lower && modulus < t.boundary_upper {
            flags.push(DiagnosticFlag::new(
                DiagnosticKind::BoundaryProximity,
                Severity::Warning,
                format!("|λ| = {modulus:.3} is near the unit circle"),
            ));
        }

        let ljung_box = if fit.is_ok() {
            let lags = t.ljung_box_lags.unwrap_or_else(|| default_lags(fit.residuals.len()));
            ljung_box(&fit.residuals, lags, fit.order.lags())
        } else {
            None
        };
        if let Some(lb) = ljung_box.filter(|lb| lb.is_significant(self.alpha)) {
            flags.push(DiagnosticFlag::new(
                DiagnosticKind::ResidualAutocorrelation,
                Severity::Info,
                format!("Ljung–Box Q = {:.2} on {} lags, p = {:.4}", lb.statistic, lb.lags, lb.p_value),
            ));
        }

        let confidence = ConfidenceScore::from_flags(&flags);
        debug!(n, flags = flags.len(), score = confidence.score, "diagnostics complete");
        DiagnosticsReport {
            sample_size: n,
            eigenvalue_modulus: modulus,
            trend,
            higher_order,
            residual_moments,
            ljung_box,
            flags,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfidenceBand;
    use par_core::{Mulberry32, RandomSource};

    fn ar2(r: f64, theta: f64, n: usize, seed: u32) -> Vec<f64> {
        let (phi1, phi2) = (2.0 * r * theta.cos(), -r * r);
        let mut rng = Mulberry32::new(seed);
        let mut x = vec![0.0, 0.0];
        for _ in 0..n + 100 {
            let next = phi1 * x[x.len() - 1] + phi2 * x[x.len() - 2] + rng.next_gaussian();
            x.push(next);
        }
        x.split_off(102)
    }

    #[test]
    fn test_clean_long_series_scores_high() {
        let series = ar2(0.7, std::f64::consts::PI / 3.0, 200, 5);
        let report = Diagnostics::default().run(&series);
        assert!(!report.has(DiagnosticKind::SampleSize));
        assert!(!report.has(DiagnosticKind::Trend));
        assert!(!report.has(DiagnosticKind::BoundaryProximity));
        assert!(!report.has(DiagnosticKind::Nonlinearity));
        assert!(report.confidence.score >= 85, "{:?}", report.flags);
        assert_eq!(report.confidence.band, ConfidenceBand::High);
    }

    #[test]
    fn test_sample_size_bands() {
        let short = ar2(0.5, 1.0, 10, 1);
        let report = Diagnostics::default().run(&short);
        assert_eq!(report.severity_of(DiagnosticKind::SampleSize), Some(Severity::Critical));
        let medium = ar2(0.5, 1.0, 30, 1);
        let report = Diagnostics::default().run(&medium);
        assert_eq!(report.severity_of(DiagnosticKind::SampleSize), Some(Severity::Warning));
    }

    #[test]
    fn test_exponential_growth_trend_is_critical() {
        let series: Vec<f64> = (0..48).map(|t| (0.05 * t as f64).exp()).collect();
        let report = Diagnostics::default().run(&series);
        assert_eq!(report.severity_of(DiagnosticKind::Trend), Some(Severity::Critical));
        assert!(report.trend.unwrap().normalized_slope > 3.0);
    }

    #[test]
    fn test_near_unit_root_flags_boundary() {
        let series = ar2(0.995, std::f64::consts::PI / 12.0, 500, 8);
        let report = Diagnostics::default().run(&series);
        assert!(report.eigenvalue_modulus > 0.93);
        assert!(report.has(DiagnosticKind::BoundaryProximity));
    }

    #[test]
    fn test_heavy_tailed_residuals_flag_nonlinearity() {
        let mut series = ar2(0.6, 1.0, 120, 3);
        for t in [20usize, 60, 100] {
            series[t] += 25.0;
        }
        let report = Diagnostics::default().run(&series);
        assert!(report.has(DiagnosticKind::Nonlinearity));
    }

    #[test]
    fn test_uncomputable_fit_is_critical() {
        let report = Diagnostics::default().run(&[1.0; 20]);
        assert_eq!(report.severity_of(DiagnosticKind::FitNotComputable), Some(Severity::Critical));
        assert!(report.residual_moments.is_none());
        assert!(report.ljung_box.is_none());
        assert!(report.confidence.score <= 60);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = Diagnostics::default().run(&ar2(0.5, 1.0, 60, 2));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("sampleSize").is_some());
        assert!(json["higherOrder"].get("aicImprovement").is_some());
        assert!(json["confidence"]["band"].is_string());
    }
}
