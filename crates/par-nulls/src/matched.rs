//! Expression- and variance-matched null
//!
//! Each gene of interest is paired with background genes of similar mean
//! expression and variance, so a persistence excess cannot be explained by
//! expression level alone.

use crate::statistic::modulus;
use crate::types::{NullOutcome, NullTestKind, NullTestResult};
use par_core::{
    math, EngineConfig, Error, GeneSeries, MatchingTolerance, Mulberry32, RandomSource, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// How one gene of interest was matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub gene_id: String,
    /// Background genes available to this gene
    pub pool_size: usize,
    /// No gene matched within tolerance; the whole background was used
    pub fell_back: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedNullReport {
    pub outcome: NullOutcome,
    pub matches: Vec<MatchSummary>,
}

impl MatchedNullReport {
    fn not_computable(reason: &str) -> Self {
        Self {
            outcome: NullOutcome::not_computable(NullTestKind::ExpressionMatched, reason),
            matches: Vec::new(),
        }
    }

    /// Genes whose matched pool fell back to the whole background
    pub fn fallback_count(&self) -> usize {
        self.matches.iter().filter(|m| m.fell_back).count()
    }
}

struct Profile {
    mean: f64,
    variance: f64,
    modulus: f64,
}

fn within(value: f64, reference: f64, tolerance: f64) -> bool {
    (value - reference).abs() <= tolerance * reference.abs()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionMatchedNull {
    draws: usize,
    tolerance: MatchingTolerance,
    alpha: f64,
    seed: u32,
}

impl ExpressionMatchedNull {
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            draws: config.resampling.matched_draws,
            tolerance: config.matching,
            alpha: config.alpha,
            seed: config.seed,
        })
    }

    pub fn with_draws(mut self, draws: usize) -> Result<Self> {
        if draws == 0 {
            return Err(Error::invalid_config("matched draws", "must be positive"));
        }
        self.draws = draws;
        Ok(self)
    }

    pub fn with_tolerance(mut self, tolerance: MatchingTolerance) -> Result<Self> {
        tolerance.validate()?;
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Test the mean modulus of `of_interest` against matched background draws
    ///
    /// Background genes sharing an id with a gene of interest are excluded.
    #[instrument(skip(self, of_interest, background), fields(of_interest = of_interest.len(), background = background.len(), draws = self.draws))]
    pub fn run(&self, of_interest: &[GeneSeries], background: &[GeneSeries]) -> Result<MatchedNullReport> {
        for gene in of_interest.iter().chain(background) {
            gene.validate()?;
        }
        let excluded: HashSet<&str> = of_interest.iter().map(|g| g.gene_id.as_str()).collect();
        let pool: Vec<Profile> = background
            .iter()
            .filter(|g| !excluded.contains(g.gene_id.as_str()))
            .filter_map(|g| {
                modulus(&g.values).map(|m| Profile {
                    mean: g.mean_expression(),
                    variance: g.variance(),
                    modulus: m,
                })
            })
            .collect();
        if pool.is_empty() {
            return Ok(MatchedNullReport::not_computable(
                "no background gene with a computable fit",
            ));
        }

        let mut observed = Vec::new();
        let mut candidates: Vec<Vec<usize>> = Vec::new();
        let mut matches = Vec::new();
        for gene in of_interest {
            let Some(m) = modulus(&gene.values) else {
                debug!(gene = %gene.gene_id, "gene of interest skipped: fit not computable");
                continue;
            };
            let (mean, variance) = (gene.mean_expression(), gene.variance());
            let matched: Vec<usize> = pool
                .iter()
                .enumerate()
                .filter(|(_, p)| {
                    within(p.mean, mean, self.tolerance.expression)
                        && within(p.variance, variance, self.tolerance.variance)
                })
                .map(|(i, _)| i)
                .collect();
            let fell_back = matched.is_empty();
            let matched = if fell_back {
                warn!(gene = %gene.gene_id, "no expression-matched background; using whole pool");
                (0..pool.len()).collect()
            } else {
                matched
            };
            matches.push(MatchSummary {
                gene_id: gene.gene_id.clone(),
                pool_size: matched.len(),
                fell_back,
            });
            observed.push(m);
            candidates.push(matched);
        }
        if observed.is_empty() {
            return Ok(MatchedNullReport::not_computable(
                "no gene of interest with a computable fit",
            ));
        }
        let observed = math::mean(&observed);

        let mut rng = Mulberry32::new(self.seed);
        let mut draw = Vec::with_capacity(candidates.len());
        let null: Vec<f64> = (0..self.draws)
            .map(|_| {
                draw.clear();
                for pool_indices in &candidates {
                    let pick = pool_indices[rng.next_index(pool_indices.len())];
                    draw.push(pool[pick].modulus);
                }
                math::mean(&draw)
            })
            .collect();

        Ok(MatchedNullReport {
            outcome: NullOutcome::Computed(NullTestResult::upper_tail(
                NullTestKind::ExpressionMatched,
                observed,
                null,
                self.alpha,
            )),
            matches,
        })
    }
}
