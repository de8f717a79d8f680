//! Clock-to-target coupling across every gene pair

use par_ar::{benjamini_hochberg, bonferroni, count_discoveries, coupling_test};
use par_core::{EngineConfig, ErrorKind, GeneSeries, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouplingPair {
    pub target_id: String,
    pub clock_id: String,
    pub clock_coefficient: f64,
    #[serde(deserialize_with = "par_core::float::unbounded")]
    pub f_statistic: f64,
    pub p_value: f64,
    /// Benjamini–Hochberg adjusted p-value
    pub q_value: f64,
    pub bonferroni_p: f64,
    pub significant_bh: bool,
    pub significant_bonferroni: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairFailure {
    pub target_id: String,
    pub clock_id: String,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouplingReport {
    pub pairs: Vec<CouplingPair>,
    pub failures: Vec<PairFailure>,
    pub alpha: f64,
    pub bh_discoveries: usize,
    pub bonferroni_discoveries: usize,
}

impl CouplingReport {
    pub fn tests(&self) -> usize {
        self.pairs.len()
    }

    /// Fraction of tested pairs significant after BH; zero with no tests
    pub fn bh_discovery_rate(&self) -> f64 {
        rate(self.bh_discoveries, self.pairs.len())
    }

    pub fn bonferroni_discovery_rate(&self) -> f64 {
        rate(self.bonferroni_discoveries, self.pairs.len())
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Tests every (target, clock) pair and corrects across the whole family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingScan {
    alpha: f64,
}

impl Default for CouplingScan {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

impl CouplingScan {
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { alpha: config.alpha })
    }

    /// Pairs that cannot be tested are reported as failures and left out
    /// of the correction family.
    #[instrument(skip_all, fields(targets = targets.len(), clocks = clocks.len()))]
    pub fn run(&self, targets: &[GeneSeries], clocks: &[GeneSeries]) -> CouplingReport {
        let mut tested = Vec::new();
        let mut failures = Vec::new();
        for target in targets {
            for clock in clocks {
                match coupling_test(&target.values, &clock.values) {
                    Ok(result) => tested.push((target, clock, result)),
                    Err(e) => {
                        debug!(target = %target.gene_id, clock = %clock.gene_id, "pair skipped: {e}");
                        failures.push(PairFailure {
                            target_id: target.gene_id.clone(),
                            clock_id: clock.gene_id.clone(),
                            kind: e.kind(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        let p_values: Vec<f64> = tested.iter().map(|(_, _, r)| r.test.p_value).collect();
        let q_values = benjamini_hochberg(&p_values);
        let bonferroni_p = bonferroni(&p_values);

        let pairs = tested
            .into_iter()
            .zip(q_values.iter().zip(&bonferroni_p))
            .map(|((target, clock, result), (&q, &b))| CouplingPair {
                target_id: target.gene_id.clone(),
                clock_id: clock.gene_id.clone(),
                clock_coefficient: result.clock_coefficient,
                f_statistic: result.test.f_statistic,
                p_value: result.test.p_value,
                q_value: q,
                bonferroni_p: b,
                significant_bh: q < self.alpha,
                significant_bonferroni: b < self.alpha,
            })
            .collect();

        CouplingReport {
            pairs,
            failures,
            alpha: self.alpha,
            bh_discoveries: count_discoveries(&q_values, self.alpha),
            bonferroni_discoveries: count_discoveries(&bonferroni_p, self.alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use par_core::{GeneCategory, Mulberry32, RandomSource};

    fn noise(n: usize, seed: u32) -> Vec<f64> {
        let mut rng = Mulberry32::new(seed);
        (0..n).map(|_| rng.next_gaussian()).collect()
    }

    /// Target driven by the previous clock value
    fn driven(clock: &[f64], seed: u32) -> Vec<f64> {
        let mut rng = Mulberry32::new(seed);
        let mut y = vec![0.0; clock.len()];
        for t in 2..clock.len() {
            y[t] = 0.4 * y[t - 1] - 0.2 * y[t - 2] + 1.5 * clock[t - 1] + 0.5 * rng.next_gaussian();
        }
        y
    }

    #[test]
    fn test_driven_pair_survives_correction() {
        let clock = GeneSeries::new("arntl", GeneCategory::Clock, noise(80, 1));
        let decoy = GeneSeries::new("decoy", GeneCategory::Clock, noise(80, 2));
        let target = GeneSeries::new("dbp", GeneCategory::Target, driven(&clock.values, 3));
        let report = CouplingScan::default().run(&[target], &[clock, decoy]);

        assert_eq!(report.tests(), 2);
        let real = &report.pairs[0];
        assert_eq!(real.clock_id, "arntl");
        assert!(real.significant_bonferroni);
        assert!(real.q_value >= real.p_value);
        assert!(real.bonferroni_p >= real.q_value);
        assert!(report.bh_discoveries >= report.bonferroni_discoveries);
        assert!(report.bh_discovery_rate() >= 0.5);
    }

    #[test]
    fn test_mismatched_lengths_are_failures() {
        let clock = GeneSeries::new("per1", GeneCategory::Clock, noise(40, 4));
        let target = GeneSeries::new("short", GeneCategory::Target, noise(30, 5));
        let report = CouplingScan::default().run(&[target], &[clock]);
        assert_eq!(report.tests(), 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, ErrorKind::InvalidInput);
        assert_eq!(report.bh_discovery_rate(), 0.0);
    }
}
