//! Orchestration of per-gene analyses into dataset results
//!
//! - [`GeneAnalyzer`]: fit, zone, grade, diagnostics, optional bootstrap
//!   interval and oscillation period for one series
//! - [`BatchScanner`]: a cancellable scan over many genes where one gene's
//!   failure becomes a [`GeneOutcome::Failed`] record instead of aborting
//! - [`DatasetSummary`]: category statistics, zone counts and the
//!   clock/target gearbox gap
//! - [`CouplingScan`]: clock-gated coupling for every (target, clock) pair
//!   with BH and Bonferroni corrections
//!
//! With the `parallel` feature, [`ExecutionStrategy::Parallel`] spreads
//! genes over the rayon pool. Random streams are keyed by gene index, so
//! the result is the same as a sequential scan.
//!
//! # Example
//!
//! ```rust
//! use par_core::{EngineConfig, GeneCategory, GeneSeries};
//! use par_engine::{BatchScanner, CancellationToken, DatasetSummary, GeneAnalyzer};
//!
//! let genes: Vec<GeneSeries> = (0..3)
//!     .map(|g| {
//!         let values = (0..36).map(|t| ((t + g) as f64 * 0.5).sin() + 0.1 * (t as f64 * 2.3).cos()).collect();
//!         GeneSeries::new(format!("gene{g}"), GeneCategory::Target, values)
//!     })
//!     .collect();
//!
//! let analyzer = GeneAnalyzer::from_config(&EngineConfig::default()).unwrap();
//! let report = BatchScanner::new(analyzer).scan(&genes, &CancellationToken::new());
//! let summary = DatasetSummary::from_report(&report);
//! assert_eq!(summary.analyzed, 3);
//! ```

pub mod analyzer;
pub mod coupling;
pub mod scanner;
pub mod summary;

pub use analyzer::{GeneAnalysis, GeneAnalyzer};
pub use coupling::{CouplingPair, CouplingReport, CouplingScan, PairFailure};
pub use scanner::{BatchScanner, CancellationToken, ExecutionStrategy, GeneOutcome, ScanReport};
pub use summary::{CategorySummary, DatasetSummary};
