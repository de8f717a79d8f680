//! Result types shared by every null test

use par_core::math;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which null hypothesis produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullTestKind {
    TimeShuffle,
    RandomGeneSet,
    ExpressionMatched,
    Fairness,
}

impl NullTestKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TimeShuffle => "time-shuffle",
            Self::RandomGeneSet => "random gene-set",
            Self::ExpressionMatched => "expression-matched",
            Self::Fairness => "fairness",
        }
    }

    fn rejection_meaning(&self) -> &'static str {
        match self {
            Self::TimeShuffle => "the persistence difference depends on temporal order",
            Self::RandomGeneSet => "the gene categories differ more than random gene sets",
            Self::ExpressionMatched => "persistence exceeds expression- and variance-matched controls",
            Self::Fairness => "the difference survives sample-size and noise matching",
        }
    }

    fn retention_meaning(&self) -> &'static str {
        match self {
            Self::TimeShuffle => "the difference is compatible with temporally shuffled data",
            Self::RandomGeneSet => "the difference is compatible with arbitrary gene sets",
            Self::ExpressionMatched => "persistence is explained by expression level and variance",
            Self::Fairness => "the difference may be a measurement-structure artifact",
        }
    }
}

impl fmt::Display for NullTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observed statistic against its resampled null distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NullTestResult {
    pub test: NullTestKind,
    pub observed_statistic: f64,
    pub null_distribution: Vec<f64>,
    /// `(count(null >= observed) + 1) / (n + 1)`, never zero
    pub empirical_p_value: f64,
    /// `(observed - null mean) / null SD`; absent for a degenerate null
    pub z_score: Option<f64>,
    pub significant: bool,
    pub interpretation: String,
}

impl NullTestResult {
    /// Upper-tail test of `observed` against `null_distribution`
    pub fn upper_tail(test: NullTestKind, observed: f64, null_distribution: Vec<f64>, alpha: f64) -> Self {
        let p = math::empirical_p_value(observed, &null_distribution);
        let z = math::z_score(observed, &null_distribution);
        Self::with_p_value(test, observed, null_distribution, p, z, alpha)
    }

    pub(crate) fn with_p_value(
        test: NullTestKind,
        observed: f64,
        null_distribution: Vec<f64>,
        empirical_p_value: f64,
        z_score: Option<f64>,
        alpha: f64,
    ) -> Self {
        let significant = empirical_p_value < alpha;
        let interpretation = interpret(test, observed, empirical_p_value, z_score, significant, null_distribution.len());
        Self {
            test,
            observed_statistic: observed,
            null_distribution,
            empirical_p_value,
            z_score,
            significant,
            interpretation,
        }
    }
}

fn interpret(
    test: NullTestKind,
    observed: f64,
    p: f64,
    z: Option<f64>,
    significant: bool,
    draws: usize,
) -> String {
    let z = z.map_or_else(|| "undefined".to_string(), |z| format!("{z:.2}"));
    let meaning = if significant {
        test.rejection_meaning()
    } else {
        test.retention_meaning()
    };
    format!(
        "{test} null over {draws} draws: observed {observed:.4}, p = {p:.4}, z = {z}; {meaning}"
    )
}

/// A null test result, or the reason none could be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NullOutcome {
    Computed(NullTestResult),
    NotComputable { test: NullTestKind, reason: String },
}

impl NullOutcome {
    pub(crate) fn not_computable(test: NullTestKind, reason: impl Into<String>) -> Self {
        Self::NotComputable {
            test,
            reason: reason.into(),
        }
    }

    pub fn test(&self) -> NullTestKind {
        match self {
            Self::Computed(result) => result.test,
            Self::NotComputable { test, .. } => *test,
        }
    }

    pub fn result(&self) -> Option<&NullTestResult> {
        match self {
            Self::Computed(result) => Some(result),
            Self::NotComputable { .. } => None,
        }
    }

    /// Computed and significant
    pub fn is_significant(&self) -> bool {
        self.result().is_some_and(|r| r.significant)
    }

    pub fn p_value(&self) -> Option<f64> {
        self.result().map(|r| r.empirical_p_value)
    }
}
