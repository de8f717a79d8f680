//! Diagnostic flags and confidence scoring

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a triggered diagnostic, ordered by impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reported but does not lower the score
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Points deducted from the confidence score
    pub fn penalty(&self) -> u32 {
        match self {
            Self::Info => 0,
            Self::Warning => 15,
            Self::Critical => 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// AR(2) fit could not be computed
    FitNotComputable,
    Trend,
    SampleSize,
    HigherOrder,
    Nonlinearity,
    BoundaryProximity,
    ResidualAutocorrelation,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FitNotComputable => "fit not computable",
            Self::Trend => "trend",
            Self::SampleSize => "sample size",
            Self::HigherOrder => "higher-order fit",
            Self::Nonlinearity => "nonlinearity",
            Self::BoundaryProximity => "boundary proximity",
            Self::ResidualAutocorrelation => "residual autocorrelation",
        };
        f.write_str(name)
    }
}

/// One triggered diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticFlag {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl DiagnosticFlag {
    pub fn new(kind: DiagnosticKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceBand {
    Unreliable,
    Low,
    Moderate,
    High,
}

impl ConfidenceBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => Self::High,
            50..=74 => Self::Moderate,
            25..=49 => Self::Low,
            _ => Self::Unreliable,
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
            Self::Low => "LOW",
            Self::Unreliable => "UNRELIABLE",
        };
        f.write_str(name)
    }
}

/// 0–100 confidence derived from diagnostic flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceScore {
    pub score: u8,
    pub band: ConfidenceBand,
}

impl ConfidenceScore {
    /// `100 - 40·critical - 15·warning`, floored at 0
    pub fn from_flags(flags: &[DiagnosticFlag]) -> Self {
        let penalty: u32 = flags.iter().map(|f| f.severity.penalty()).sum();
        let score = 100u32.saturating_sub(penalty) as u8;
        Self {
            score,
            band: ConfidenceBand::from_score(score),
        }
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100 ({})", self.score, self.band)
    }
}
