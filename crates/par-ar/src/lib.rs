//! Autoregressive estimation and model selection
//!
//! This crate fits AR(1), AR(2) and AR(3) models to short expression time
//! series, extracts the dominant characteristic root (the persistence
//! "eigenvalue"), and provides the model-selection tools used to check that
//! AR(2) is an adequate description:
//!
//! - [`fit_ar`] / [`ArFitter`]: least-squares or Yule–Walker estimation
//! - [`DominantRoot`]: closed-form root extraction up to order 3
//! - [`compare_orders`]: AIC/BIC/AICc on a common observation window
//! - [`nested_f_test`]: F-test between nested linear models
//! - [`coupling_test`]: clock-gated AR(2) coupling
//! - [`benjamini_hochberg`] / [`bonferroni`]: multiple-testing corrections
//!
//! # Example
//!
//! ```rust
//! use par_ar::{fit_ar2, compare_orders};
//!
//! let series: Vec<f64> = (0..48)
//!     .map(|t| (t as f64 * std::f64::consts::PI / 6.0).cos() + 0.01 * (t as f64 * 1.7).sin())
//!     .collect();
//! let fit = fit_ar2(&series);
//! assert!(fit.is_ok());
//! assert!(fit.eigenvalue_modulus > 0.9);
//!
//! let comparison = compare_orders(&series);
//! assert!(comparison.best_by_aic.is_some());
//! ```

pub mod coupling;
pub mod fit;
pub mod linalg;
pub mod multiple_testing;
pub mod roots;
pub mod selection;

pub use coupling::{coupling_test, CouplingResult, MIN_COUPLING_LENGTH};
pub use fit::{fit_ar, fit_ar2, ArFit, ArFitter, ArOrder, FitMethod, FitStatus};
pub use multiple_testing::{benjamini_hochberg, bonferroni, count_discoveries};
pub use roots::{dominant_root, DominantRoot};
pub use selection::{compare_orders, nested_f_test, FTestResult, OrderComparison, COMMON_WINDOW_START};
