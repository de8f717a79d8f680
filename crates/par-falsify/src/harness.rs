//! Step-wise falsification run

use crate::fixtures::{standard_fixtures, Fixture};
use crate::oracle::{FalsificationOracle, FixtureVerdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalibrationVerdict {
    Calibrated,
    /// Exactly one expectation violated
    Suspect,
    /// Two or more expectations violated
    Miscalibrated,
}

impl CalibrationVerdict {
    pub fn from_violations(violations: usize) -> Self {
        match violations {
            0 => Self::Calibrated,
            1 => Self::Suspect,
            _ => Self::Miscalibrated,
        }
    }
}

impl fmt::Display for CalibrationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calibrated => write!(f, "CALIBRATED"),
            Self::Suspect => write!(f, "SUSPECT"),
            Self::Miscalibrated => write!(f, "MISCALIBRATED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FalsificationReport {
    pub verdicts: Vec<FixtureVerdict>,
    pub violations: usize,
    pub verdict: CalibrationVerdict,
}

impl FalsificationReport {
    pub fn from_verdicts(verdicts: Vec<FixtureVerdict>) -> Self {
        let violations = verdicts.iter().filter(|v| !v.upheld).count();
        Self {
            verdict: CalibrationVerdict::from_violations(violations),
            verdicts,
            violations,
        }
    }

    pub fn violated(&self) -> impl Iterator<Item = &FixtureVerdict> {
        self.verdicts.iter().filter(|v| !v.upheld)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Ready,
    Running { next: usize },
    Finished,
}

/// Judges fixtures one at a time
#[derive(Debug, Clone)]
pub struct FalsificationHarness {
    oracle: FalsificationOracle,
    fixtures: Vec<Fixture>,
    verdicts: Vec<FixtureVerdict>,
    state: HarnessState,
}

impl FalsificationHarness {
    pub fn new(oracle: FalsificationOracle, fixtures: Vec<Fixture>) -> Self {
        Self {
            oracle,
            fixtures,
            verdicts: Vec::new(),
            state: HarnessState::Ready,
        }
    }

    /// Standard fixture panel with default thresholds
    pub fn standard() -> Self {
        Self::new(FalsificationOracle::default(), standard_fixtures())
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn verdicts(&self) -> &[FixtureVerdict] {
        &self.verdicts
    }

    /// Judge the next fixture; returns `None` once finished
    pub fn step(&mut self) -> Option<&FixtureVerdict> {
        let index = match self.state {
            HarnessState::Ready => 0,
            HarnessState::Running { next } => next,
            HarnessState::Finished => return None,
        };
        let Some(fixture) = self.fixtures.get(index) else {
            self.state = HarnessState::Finished;
            return None;
        };

        let verdict = self.oracle.judge(fixture);
        if verdict.upheld {
            debug!(fixture = %verdict.fixture, class = %verdict.class, "{}", verdict.reason);
        } else {
            warn!(fixture = %verdict.fixture, class = %verdict.class, "violated: {}", verdict.reason);
        }
        self.verdicts.push(verdict);
        self.state = if index + 1 < self.fixtures.len() {
            HarnessState::Running { next: index + 1 }
        } else {
            HarnessState::Finished
        };
        self.verdicts.last()
    }

    pub fn run_to_completion(mut self) -> FalsificationReport {
        while self.step().is_some() {}
        let report = FalsificationReport::from_verdicts(self.verdicts);
        info!(
            fixtures = report.verdicts.len(),
            violations = report.violations,
            "falsification {}",
            report.verdict
        );
        report
    }
}
