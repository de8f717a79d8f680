//! AR(p) estimation for p = 1, 2, 3
//!
//! Series are mean-centred over their full length. Lag rows are then built
//! from a window starting at `max(order, window_start)`, which lets model
//! selection compare orders on a common set of observations.
//!
//! Estimation never fails with an error: short series produce an
//! insufficient-data fit and singular systems a degenerate one, each with a
//! status label and values that cannot be mistaken for a real estimate.

use crate::linalg;
use crate::roots::dominant_root;
use nalgebra::{DMatrix, DVector};
use par_core::{math, Error};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Residual variance floor relative to the window variance, keeps
/// likelihoods finite for exact fits
const VARIANCE_FLOOR: f64 = 1e-12;

/// Autoregressive order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "usize", try_from = "usize")]
pub enum ArOrder {
    One,
    Two,
    Three,
}

impl ArOrder {
    pub const ALL: [ArOrder; 3] = [ArOrder::One, ArOrder::Two, ArOrder::Three];

    /// Number of lag coefficients
    pub const fn lags(self) -> usize {
        match self {
            ArOrder::One => 1,
            ArOrder::Two => 2,
            ArOrder::Three => 3,
        }
    }

    /// Shortest series that can be fitted at this order
    pub const fn min_length(self) -> usize {
        self.lags() + 3
    }
}

impl From<ArOrder> for usize {
    fn from(order: ArOrder) -> Self {
        order.lags()
    }
}

impl TryFrom<usize> for ArOrder {
    type Error = Error;

    fn try_from(lags: usize) -> Result<Self, Self::Error> {
        match lags {
            1 => Ok(ArOrder::One),
            2 => Ok(ArOrder::Two),
            3 => Ok(ArOrder::Three),
            other => Err(Error::InvalidInput(format!(
                "AR order must be 1, 2 or 3, got {other}"
            ))),
        }
    }
}

impl fmt::Display for ArOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AR({})", self.lags())
    }
}

/// Coefficient estimator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMethod {
    /// Conditional least squares on the lag rows
    #[default]
    LeastSquares,
    /// Toeplitz autocovariance equations
    YuleWalker,
}

/// Whether a fit produced usable estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FitStatus {
    Ok,
    InsufficientData { required: usize, actual: usize },
    Degenerate { reason: String },
}

impl FitStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FitStatus::Ok)
    }
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitStatus::Ok => write!(f, "ok"),
            FitStatus::InsufficientData { required, actual } => {
                write!(f, "not computable: need at least {required} samples, got {actual}")
            }
            FitStatus::Degenerate { reason } => write!(f, "not computable: {reason}"),
        }
    }
}

/// Result of fitting an AR(p) model
///
/// `eigenvalue_modulus` is the raw dominant-root modulus and may exceed 1;
/// use [`ArFit::display_modulus`] for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArFit {
    pub order: ArOrder,
    pub method: FitMethod,
    pub coefficients: Vec<f64>,
    pub eigenvalue_modulus: f64,
    pub is_complex_root: bool,
    /// Argument of the dominant root in radians
    pub root_argument: f64,
    pub r_squared: f64,
    pub residual_sum_squares: f64,
    /// `SSR / T`
    pub residual_variance: f64,
    #[serde(deserialize_with = "par_core::float::unbounded")]
    pub aic: f64,
    #[serde(deserialize_with = "par_core::float::unbounded")]
    pub bic: f64,
    #[serde(deserialize_with = "par_core::float::unbounded")]
    pub aicc: f64,
    pub effective_observations: usize,
    #[serde(flatten)]
    pub status: FitStatus,
    #[serde(skip)]
    pub residuals: Vec<f64>,
}

impl ArFit {
    fn not_computable(
        order: ArOrder,
        method: FitMethod,
        effective_observations: usize,
        status: FitStatus,
    ) -> Self {
        Self {
            order,
            method,
            coefficients: vec![0.0; order.lags()],
            eigenvalue_modulus: 0.0,
            is_complex_root: false,
            root_argument: 0.0,
            r_squared: 0.0,
            residual_sum_squares: 0.0,
            residual_variance: 0.0,
            aic: f64::INFINITY,
            bic: f64::INFINITY,
            aicc: f64::INFINITY,
            effective_observations,
            status,
            residuals: Vec::new(),
        }
    }

    pub(crate) fn insufficient(order: ArOrder, method: FitMethod, required: usize, actual: usize) -> Self {
        Self::not_computable(
            order,
            method,
            0,
            FitStatus::InsufficientData { required, actual },
        )
    }

    pub(crate) fn degenerate(
        order: ArOrder,
        method: FitMethod,
        effective_observations: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::not_computable(
            order,
            method,
            effective_observations,
            FitStatus::Degenerate {
                reason: reason.into(),
            },
        )
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Modulus clamped to `ceiling` for presentation
    pub fn display_modulus(&self, ceiling: f64) -> f64 {
        self.eigenvalue_modulus.min(ceiling)
    }

    /// Whether the coefficients lie in the stationary region
    ///
    /// For AR(2) this is the stability triangle `|φ2| < 1`, `φ1 + φ2 < 1`,
    /// `φ2 − φ1 < 1`. Reported, never enforced.
    pub fn within_stability_triangle(&self) -> bool {
        match self.coefficients.as_slice() {
            [phi1] => phi1.abs() < 1.0,
            [phi1, phi2] => phi2.abs() < 1.0 && phi1 + phi2 < 1.0 && phi2 - phi1 < 1.0,
            _ => self.eigenvalue_modulus < 1.0,
        }
    }

    /// Oscillation period implied by a complex dominant root
    pub fn period(&self, sampling_interval_hours: f64) -> Option<f64> {
        if !self.is_ok() || !self.is_complex_root || self.root_argument <= 0.0 {
            return None;
        }
        Some(TAU / self.root_argument * sampling_interval_hours)
    }

    /// Half-life in samples of the dominant-root envelope
    pub fn half_life(&self) -> Option<f64> {
        let m = self.eigenvalue_modulus;
        (self.is_ok() && m > 0.0 && m < 1.0).then(|| (0.5f64).ln() / m.ln())
    }
}

impl fmt::Display for ArFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_ok() {
            return write!(f, "{}: {}", self.order, self.status);
        }
        write!(
            f,
            "{}: |λ| = {:.4}{}, R² = {:.3}, AIC = {:.2}",
            self.order,
            self.eigenvalue_modulus,
            if self.is_complex_root { " (complex)" } else { "" },
            self.r_squared,
            self.aic
        )
    }
}

/// AR estimator configuration
///
/// # Example
///
/// ```rust
/// use par_ar::{ArFitter, ArOrder, FitMethod};
///
/// let series: Vec<f64> = (0..48).map(|t| (t as f64 * std::f64::consts::PI / 3.0).sin()).collect();
/// let fit = ArFitter::new().with_method(FitMethod::LeastSquares).fit(&series, ArOrder::Two);
/// assert!((fit.eigenvalue_modulus - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArFitter {
    method: FitMethod,
    window_start: usize,
}

impl ArFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: FitMethod) -> Self {
        self.method = method;
        self
    }

    /// First time index used as a response; never below the order
    pub fn with_window_start(mut self, start: usize) -> Self {
        self.window_start = start;
        self
    }

    pub fn method(&self) -> FitMethod {
        self.method
    }

    /// Fit an AR model of the given order
    pub fn fit(&self, series: &[f64], order: ArOrder) -> ArFit {
        let lags = order.lags();
        let n = series.len();
        let start = self.window_start.max(lags);
        let required = start + 3;
        if n < required {
            return ArFit::insufficient(order, self.method, required, n);
        }
        let t_obs = n - start;
        if series.iter().any(|v| !v.is_finite()) {
            return ArFit::degenerate(order, self.method, t_obs, "series contains NaN or infinite values");
        }

        let mean = math::mean(series);
        let centered: Vec<f64> = series.iter().map(|v| v - mean).collect();
        let y = DVector::from_fn(t_obs, |r, _| centered[start + r]);
        let sst = y.norm_squared();
        if !(sst > 0.0) {
            return ArFit::degenerate(order, self.method, t_obs, "zero variance in fit window");
        }

        let coefficients = match self.method {
            FitMethod::LeastSquares => {
                let x = DMatrix::from_fn(t_obs, lags, |r, k| centered[start + r - 1 - k]);
                linalg::least_squares(&x, &y)
            }
            FitMethod::YuleWalker => linalg::yule_walker(&centered, lags),
        };
        let Some(coefficients) = coefficients else {
            return ArFit::degenerate(
                order,
                self.method,
                t_obs,
                format!(
                    "singular {} system (normalised determinant below {:e})",
                    match self.method {
                        FitMethod::LeastSquares => "normal-equation",
                        FitMethod::YuleWalker => "Yule-Walker",
                    },
                    linalg::SINGULAR_DETERMINANT
                ),
            );
        };

        let residuals: Vec<f64> = (start..n)
            .map(|t| {
                let predicted: f64 = coefficients
                    .iter()
                    .enumerate()
                    .map(|(k, phi)| phi * centered[t - 1 - k])
                    .sum();
                centered[t] - predicted
            })
            .collect();
        let rss: f64 = residuals.iter().map(|e| e * e).sum();

        let Some(root) = dominant_root(&coefficients) else {
            return ArFit::degenerate(order, self.method, t_obs, "unsupported coefficient count");
        };

        let t = t_obs as f64;
        let k = (lags + 1) as f64;
        let sigma2 = (rss / t).max(VARIANCE_FLOOR * sst / t);
        let log_likelihood = -0.5 * t * ((2.0 * PI * sigma2).ln() + 1.0);
        let aic = 2.0 * k - 2.0 * log_likelihood;
        let bic = k * t.ln() - 2.0 * log_likelihood;
        let aicc = if t - k - 1.0 > 0.0 {
            aic + 2.0 * k * (k + 1.0) / (t - k - 1.0)
        } else {
            f64::INFINITY
        };

        ArFit {
            order,
            method: self.method,
            coefficients,
            eigenvalue_modulus: root.modulus,
            is_complex_root: root.is_complex,
            root_argument: root.argument,
            r_squared: 1.0 - rss / sst,
            residual_sum_squares: rss,
            residual_variance: rss / t,
            aic,
            bic,
            aicc,
            effective_observations: t_obs,
            status: FitStatus::Ok,
            residuals,
        }
    }
}

/// Least-squares AR fit of the given order
pub fn fit_ar(series: &[f64], order: ArOrder) -> ArFit {
    ArFitter::new().fit(series, order)
}

/// Least-squares AR(2) fit
pub fn fit_ar2(series: &[f64]) -> ArFit {
    fit_ar(series, ArOrder::Two)
}
