//! AR(2) persistence inference and validation for gene-expression time series
//!
//! This crate re-exports the workspace crates:
//!
//! - [`common`]: errors, configuration, the seeded generator, `GeneSeries`
//! - [`ar`]: AR fitting, root extraction, order selection, coupling tests
//! - [`stability`]: zone classification and fit grading
//! - [`resample`]: resampling primitives and the block bootstrap
//! - [`nulls`]: permutation, gene-set, matched and fairness nulls
//! - [`diagnostics`]: diagnostic flags, confidence score, gearbox gap
//! - [`falsify`]: synthetic fixtures and the falsification oracle
//! - [`engine`]: per-gene analysis, batch scans and dataset summaries

pub use par_ar as ar;
pub use par_core as common;
pub use par_diagnostics as diagnostics;
pub use par_engine as engine;
pub use par_falsify as falsify;
pub use par_nulls as nulls;
pub use par_resample as resample;
pub use par_stability as stability;

pub mod prelude {
    pub use par_ar::{fit_ar, fit_ar2, ArFit, ArOrder, FitMethod};
    pub use par_core::{EngineConfig, Error, GeneCategory, GeneSeries, Mulberry32, Result};
    pub use par_diagnostics::{Diagnostics, GearboxGap};
    pub use par_engine::{BatchScanner, CancellationToken, DatasetSummary, GeneAnalyzer};
    pub use par_stability::{FitGrade, StabilityClassifier, StabilityZone};
}
