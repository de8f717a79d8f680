//! Persistence zone classification and fit grading
//!
//! Maps the raw dominant-root modulus of an AR fit onto ordered persistence
//! zones and grades fit quality from R². Zone boundaries and grade cut
//! points come from [`par_core::EngineConfig`]; alternative boundary sets are
//! selected explicitly through the [`par_core::ZoneBoundaries`] presets.
//!
//! # Example
//!
//! ```rust
//! use par_core::ZoneBoundaries;
//! use par_stability::{classify, StabilityZone};
//!
//! assert_eq!(classify(0.55, &ZoneBoundaries::default()), StabilityZone::Target);
//! assert_eq!(classify(0.55, &ZoneBoundaries::simulator_bridge()), StabilityZone::Target);
//! assert_eq!(classify(0.50, &ZoneBoundaries::simulator_bridge()), StabilityZone::FastDecay);
//! ```

pub mod classifier;
pub mod types;

pub use classifier::{classify, grade_fit, StabilityClassifier};
pub use types::{FitGrade, StabilityAssessment, StabilityZone};
