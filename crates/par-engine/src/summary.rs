//! Dataset-level summary of a scan

use crate::analyzer::GeneAnalysis;
use crate::scanner::ScanReport;
use par_core::{math, GeneCategory};
use par_diagnostics::GearboxGap;
use par_stability::StabilityZone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw-modulus statistics of one gene category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: GeneCategory,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample SD; zero for a single gene
    pub std_dev: f64,
}

impl CategorySummary {
    fn of(category: GeneCategory, moduli: &[f64]) -> Option<Self> {
        if moduli.is_empty() {
            return None;
        }
        Some(Self {
            category,
            count: moduli.len(),
            mean: math::mean(moduli),
            median: math::median(moduli),
            std_dev: if moduli.len() > 1 { math::sample_std_dev(moduli) } else { 0.0 },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub requested: usize,
    pub analyzed: usize,
    pub failed: usize,
    /// Analyzed genes whose fit was not computable
    pub not_computable: usize,
    pub categories: Vec<CategorySummary>,
    pub zone_counts: BTreeMap<StabilityZone, usize>,
    /// Clock minus target mean modulus; absent without both groups
    pub gearbox: Option<GearboxGap>,
    pub mean_confidence: Option<f64>,
}

impl DatasetSummary {
    /// Category statistics and the gearbox gap use computable fits only
    pub fn from_report(report: &ScanReport) -> Self {
        let analyses: Vec<&GeneAnalysis> = report.analyses().collect();
        let computable: Vec<&GeneAnalysis> = analyses.iter().copied().filter(|a| a.fit.is_ok()).collect();
        let moduli_of = |category: GeneCategory| -> Vec<f64> {
            computable
                .iter()
                .filter(|a| a.category == category)
                .map(|a| a.raw_modulus())
                .collect()
        };

        let clock = moduli_of(GeneCategory::Clock);
        let target = moduli_of(GeneCategory::Target);
        let other = moduli_of(GeneCategory::Other);
        let categories = [
            (GeneCategory::Clock, &clock),
            (GeneCategory::Target, &target),
            (GeneCategory::Other, &other),
        ]
        .into_iter()
        .filter_map(|(category, moduli)| CategorySummary::of(category, moduli))
        .collect();

        let mut zone_counts = BTreeMap::new();
        for analysis in &computable {
            *zone_counts.entry(analysis.assessment.zone).or_insert(0) += 1;
        }

        let scores: Vec<f64> = analyses
            .iter()
            .map(|a| f64::from(a.diagnostics.confidence.score))
            .collect();

        Self {
            requested: report.requested,
            analyzed: analyses.len(),
            failed: report.failures().count(),
            not_computable: analyses.len() - computable.len(),
            categories,
            zone_counts,
            gearbox: GearboxGap::from_groups(&clock, &target),
            mean_confidence: (!scores.is_empty()).then(|| math::mean(&scores)),
        }
    }

    pub fn category(&self, category: GeneCategory) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn zone_count(&self, zone: StabilityZone) -> usize {
        self.zone_counts.get(&zone).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::GeneAnalyzer;
    use crate::scanner::{BatchScanner, CancellationToken};
    use approx::assert_relative_eq;
    use par_core::{EngineConfig, GeneSeries, Mulberry32, RandomSource};
    use par_diagnostics::HierarchyCall;

    fn ar2(modulus: f64, n: usize, seed: u32) -> Vec<f64> {
        let phi1 = modulus;
        let phi2 = -modulus * modulus;
        let mut rng = Mulberry32::new(seed);
        let mut x = vec![0.0, 0.0];
        for t in 2..n + 102 {
            let next = phi1 * x[t - 1] + phi2 * x[t - 2] + rng.next_gaussian();
            x.push(next);
        }
        x.split_off(102)
    }

    fn panel() -> Vec<GeneSeries> {
        let mut genes = Vec::new();
        for i in 0..4 {
            genes.push(GeneSeries::new(format!("clock{i}"), GeneCategory::Clock, ar2(0.85, 400, i)));
            genes.push(GeneSeries::new(format!("target{i}"), GeneCategory::Target, ar2(0.3, 400, 100 + i)));
        }
        genes.push(GeneSeries::new("flat", GeneCategory::Other, vec![1.0; 40]));
        genes.push(GeneSeries::new("stub", GeneCategory::Other, vec![1.0, 2.0]));
        genes
    }

    #[test]
    fn test_summary_counts_and_gap() {
        let analyzer = GeneAnalyzer::from_config(&EngineConfig::default()).unwrap();
        let report = BatchScanner::new(analyzer).scan(&panel(), &CancellationToken::new());
        let summary = DatasetSummary::from_report(&report);

        assert_eq!(summary.requested, 10);
        assert_eq!(summary.analyzed, 9);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.not_computable, 1);
        assert_eq!(summary.category(GeneCategory::Clock).unwrap().count, 4);
        assert!(summary.category(GeneCategory::Other).is_none());
        assert_eq!(summary.zone_counts.values().sum::<usize>(), 8);

        let gap = summary.gearbox.unwrap();
        assert!(gap.gap > 0.3, "{gap}");
        assert_eq!(gap.call, HierarchyCall::Preserved);
        let clock = summary.category(GeneCategory::Clock).unwrap();
        assert_relative_eq!(gap.clock_mean, clock.mean);
        assert!(summary.mean_confidence.unwrap() <= 100.0);
    }

    #[test]
    fn test_empty_report() {
        let report = ScanReport {
            outcomes: Vec::new(),
            requested: 0,
            cancelled: false,
        };
        let summary = DatasetSummary::from_report(&report);
        assert!(summary.gearbox.is_none());
        assert!(summary.mean_confidence.is_none());
        assert_eq!(summary.zone_count(StabilityZone::Clock), 0);
    }
}
