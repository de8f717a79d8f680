//! Resampling and block-bootstrap intervals
//!
//! - [`downsample`], [`add_noise`], [`block_resample`], [`permute_labels`]:
//!   the resampling primitives every null test and fairness control builds on
//! - [`BlockBootstrap`]: moving-block bootstrap interval for the AR
//!   eigenvalue modulus, with pluggable [`BootstrapMethod`]s
//!
//! # Example
//!
//! ```rust
//! use par_resample::BlockBootstrap;
//!
//! let series: Vec<f64> = (0..96)
//!     .map(|t| (t as f64 * std::f64::consts::PI / 6.0).sin() * 0.9f64.powi(t % 12) + 0.05 * (t as f64 * 2.3).cos())
//!     .collect();
//! let result = BlockBootstrap::default()
//!     .with_iterations(50)
//!     .eigenvalue_interval(&series)
//!     .unwrap();
//! assert!(result.percentile_interval.lower <= result.percentile_interval.upper);
//! ```

pub mod bootstrap;
pub mod bootstrap_methods;
pub mod resample;
pub mod types;

pub use bootstrap::{BlockBootstrap, EigenvalueBootstrap};
pub use bootstrap_methods::{
    BasicBootstrap, BootstrapMethod, MedianCenteredBootstrap, PercentileBootstrap,
};
pub use resample::{add_noise, block_resample, default_block_length, downsample, permute_labels};
pub use types::{BootstrapPercentiles, ConfidenceInterval};
