//! Null-hypothesis tests for persistence differences
//!
//! Every test is built from an [`EngineConfig`](par_core::EngineConfig),
//! which supplies iteration counts, tolerances, α and the seed and is
//! validated before any resampling starts. Each run draws from a single
//! seeded generator, so results are reproducible bit for bit.
//!
//! - [`TimeShuffleNull`]: does the clock/target gap depend on temporal order?
//! - [`RandomGeneSetNull`]: do the categories differ more than random sets?
//! - [`ExpressionMatchedNull`]: is persistence explained by expression level?
//! - [`FairnessControl`]: does a cross-condition difference survive matching
//!   sample size and noise?

pub mod fairness;
pub mod gene_set;
pub mod matched;
pub mod statistic;
pub mod time_shuffle;
pub mod types;

pub use fairness::{matching_noise_level, DegradationPlan, FairnessControl, FairnessReport, NoiseMatching};
pub use gene_set::RandomGeneSetNull;
pub use matched::{ExpressionMatchedNull, MatchSummary, MatchedNullReport};
pub use statistic::{mean_modulus, modulus, persistence_gap};
pub use time_shuffle::TimeShuffleNull;
pub use types::{NullOutcome, NullTestKind, NullTestResult};
