//! Diagnostic screens and confidence scoring for AR(2) persistence
//!
//! [`Diagnostics::run`] screens one series for the conditions under which
//! an AR(2) eigenvalue should not be trusted:
//!
//! | Screen | Trigger | Severity |
//! |---|---|---|
//! | Trend | normalised slope > 3 and \|λ\| > 0.9 | Critical |
//! | Sample size | n < 12 / n < 50 | Critical / Warning |
//! | Higher order | ΔAIC(AR3) > 2 and ΔR² > 0.02 | Warning |
//! | Nonlinearity | residual \|skew\| > 1 or excess kurtosis > 3 | Warning |
//! | Boundary | 0.93 < \|λ\| < 1.07 | Warning |
//! | Ljung–Box | residual p < α | Info |
//!
//! Flags fold into a [`ConfidenceScore`]. [`GearboxGap`] turns two groups
//! of moduli into an uncertainty-aware hierarchy call.

pub mod gearbox;
pub mod ljung_box;
pub mod moments;
pub mod report;
pub mod trend;
pub mod types;

pub use gearbox::{GearboxGap, HierarchyCall};
pub use ljung_box::{default_lags, ljung_box, LjungBox};
pub use moments::{excess_kurtosis, skewness, Moments};
pub use report::{Diagnostics, DiagnosticsReport, HigherOrderCheck};
pub use trend::{linear_trend, LinearTrend};
pub use types::{ConfidenceBand, ConfidenceScore, DiagnosticFlag, DiagnosticKind, Severity};
