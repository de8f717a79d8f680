//! Gene expression time series input record

use crate::{math, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional class of a gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneCategory {
    Clock,
    Target,
    Other,
}

impl fmt::Display for GeneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneCategory::Clock => write!(f, "clock"),
            GeneCategory::Target => write!(f, "target"),
            GeneCategory::Other => write!(f, "other"),
        }
    }
}

/// One gene's expression values at regularly spaced time points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneSeries {
    pub gene_id: String,
    pub category: GeneCategory,
    pub values: Vec<f64>,
    pub sampling_interval_hours: f64,
}

impl GeneSeries {
    /// Series sampled every 2 hours
    pub fn new(gene_id: impl Into<String>, category: GeneCategory, values: Vec<f64>) -> Self {
        Self {
            gene_id: gene_id.into(),
            category,
            values,
            sampling_interval_hours: 2.0,
        }
    }

    pub fn with_sampling_interval(mut self, hours: f64) -> Self {
        self.sampling_interval_hours = hours;
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean expression level
    pub fn mean_expression(&self) -> f64 {
        math::mean(&self.values)
    }

    /// Population variance of the expression values
    pub fn variance(&self) -> f64 {
        math::population_variance(&self.values)
    }

    /// Reject empty ids, non-finite values and invalid sampling intervals
    pub fn validate(&self) -> Result<()> {
        if self.gene_id.trim().is_empty() {
            return Err(Error::InvalidInput("gene id must not be empty".to_string()));
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite(&format!("series '{}'", self.gene_id)));
        }
        if !self.sampling_interval_hours.is_finite() || self.sampling_interval_hours <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "series '{}' has invalid sampling interval {}",
                self.gene_id, self.sampling_interval_hours
            )));
        }
        Ok(())
    }
}
