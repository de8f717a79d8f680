//! Falsifiability harness
//!
//! Synthetic inputs whose correct treatment is known in advance, and an
//! oracle that checks the engine treats them that way:
//!
//! | Class | Fixtures | Upheld when |
//! |---|---|---|
//! | `NONSENSE` | uniform noise, random walk, under-sampled sinusoid | grade below Good or zone not Target/Clock |
//! | `NON_RECURRENT` | exponential growth | grade below Good or critical trend flag |
//! | `ADVERSARIAL` | AR(2) at modulus 0.995 | raw modulus above 0.93 |
//! | `CONTROL` | AR(2) at modulus 0.537 and 0.95 | modulus within 0.05, Good when the process is |
//!
//! Two or more violations mark the engine miscalibrated.
//!
//! # Example
//!
//! ```rust,no_run
//! use par_falsify::{CalibrationVerdict, FalsificationHarness};
//!
//! let report = FalsificationHarness::standard().run_to_completion();
//! assert_eq!(report.verdict, CalibrationVerdict::Calibrated);
//! ```

pub mod fixtures;
pub mod harness;
pub mod oracle;

pub use fixtures::{standard_fixtures, Expectation, Fixture};
pub use harness::{CalibrationVerdict, FalsificationHarness, FalsificationReport, HarnessState};
pub use oracle::{FalsificationOracle, FixtureVerdict};
