//! Error types for AR(2) persistence analysis
//!
//! Provides a unified error type for all par-* crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Core error type for persistence analysis operations
#[derive(Error, Debug)]
pub enum Error {
    /// Series too short for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Singular or near-singular system, zero variance, or similar
    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),

    /// Invalid engine configuration (iteration counts, thresholds, tolerances)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Serialisable discriminant of [`Error`], used in per-gene error records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientData,
    NumericalDegeneracy,
    Configuration,
    InvalidInput,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::NumericalDegeneracy => "numerical_degeneracy",
            ErrorKind::Configuration => "configuration",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

// Helper functions for common error patterns

impl Error {
    /// Discriminant of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InsufficientData { .. } => ErrorKind::InsufficientData,
            Error::NumericalDegeneracy(_) => ErrorKind::NumericalDegeneracy,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Create an error for an out-of-range configuration field
    pub fn invalid_config(field: &str, reason: impl fmt::Display) -> Self {
        Self::Configuration(format!("{field}: {reason}"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Check a minimum sample size
    pub fn check_length(actual: usize, expected: usize) -> Result<()> {
        if actual < expected {
            return Err(Self::InsufficientData { expected, actual });
        }
        Ok(())
    }
}
