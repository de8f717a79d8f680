//! Random gene-set null
//!
//! Pseudo clock and target sets of the observed sizes are drawn without
//! replacement from the whole gene pool. Moduli are fitted once per gene
//! and reused across draws.

use crate::statistic::modulus;
use crate::types::{NullOutcome, NullTestKind, NullTestResult};
use par_core::{math, EngineConfig, Error, GeneCategory, GeneSeries, Mulberry32, Result};
use rand::seq::index;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomGeneSetNull {
    draws: usize,
    alpha: f64,
    seed: u32,
}

impl RandomGeneSetNull {
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            draws: config.resampling.gene_set_draws,
            alpha: config.alpha,
            seed: config.seed,
        })
    }

    pub fn with_draws(mut self, draws: usize) -> Result<Self> {
        if draws == 0 {
            return Err(Error::invalid_config("gene set draws", "must be positive"));
        }
        self.draws = draws;
        Ok(self)
    }

    /// Test the clock-minus-target gap against random same-size gene sets
    ///
    /// Genes without a computable fit are left out of both the observed
    /// groups and the pool.
    ///
    /// One-sided: significance means the clock group is more persistent
    /// than random sets. Relabel the categories to test the reverse.
    #[instrument(skip(self, genes), fields(genes = genes.len(), draws = self.draws))]
    pub fn run(&self, genes: &[GeneSeries]) -> Result<NullOutcome> {
        let mut pool = Vec::with_capacity(genes.len());
        for gene in genes {
            gene.validate()?;
            if let Some(m) = modulus(&gene.values) {
                pool.push((gene.category, m));
            }
        }
        let group = |category: GeneCategory| -> Vec<f64> {
            pool.iter().filter(|(c, _)| *c == category).map(|&(_, m)| m).collect()
        };
        let clock = group(GeneCategory::Clock);
        let target = group(GeneCategory::Target);
        if clock.is_empty() || target.is_empty() {
            return Ok(NullOutcome::not_computable(
                NullTestKind::RandomGeneSet,
                "clock and target groups both need a computable fit",
            ));
        }
        let observed = math::mean(&clock) - math::mean(&target);

        let moduli: Vec<f64> = pool.iter().map(|&(_, m)| m).collect();
        let (n_clock, n_target) = (clock.len(), target.len());
        let mut rng = Mulberry32::new(self.seed);
        let mut null = Vec::with_capacity(self.draws);
        let mut pseudo_clock = Vec::with_capacity(n_clock);
        let mut pseudo_target = Vec::with_capacity(n_target);
        for _ in 0..self.draws {
            let picked = index::sample(&mut rng, moduli.len(), n_clock + n_target);
            pseudo_clock.clear();
            pseudo_target.clear();
            for (k, i) in picked.iter().enumerate() {
                if k < n_clock {
                    pseudo_clock.push(moduli[i]);
                } else {
                    pseudo_target.push(moduli[i]);
                }
            }
            null.push(math::mean(&pseudo_clock) - math::mean(&pseudo_target));
        }
        debug!(observed, pool = moduli.len(), "random gene-set null built");

        Ok(NullOutcome::Computed(NullTestResult::upper_tail(
            NullTestKind::RandomGeneSet,
            observed,
            null,
            self.alpha,
        )))
    }
}
