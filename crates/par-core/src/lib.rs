//! Core types for AR(2) persistence analysis
//!
//! This crate provides what every par-* crate shares:
//!
//! - [`Error`] / [`Result`]: the unified error taxonomy
//! - [`EngineConfig`]: the single configuration table of thresholds,
//!   iteration counts, tolerances and the seed
//! - [`Mulberry32`] / [`RandomSource`]: the only random generator the engine
//!   constructs
//! - [`math`]: descriptive and empirical-distribution helpers
//! - [`GeneSeries`]: the immutable input record
//! - [`float`]: JSON round-trip of infinite statistics

pub mod config;
pub mod error;
pub mod float;
pub mod math;
pub mod rng;
pub mod series;

pub use config::{
    DiagnosticThresholds, EngineConfig, FitGradeThresholds, MatchingTolerance,
    ResamplingConfig, ZoneBoundaries,
};
pub use error::{Error, ErrorKind, Result};
pub use rng::{Mulberry32, RandomSource};
pub use series::{GeneCategory, GeneSeries};
