use par_core::{EngineConfig, ErrorKind, GeneCategory, GeneSeries, Mulberry32, RandomSource, ResamplingConfig};
use par_diagnostics::HierarchyCall;
use par_engine::{
    BatchScanner, CancellationToken, DatasetSummary, ExecutionStrategy, GeneAnalyzer, GeneOutcome, ScanReport,
};

fn genes() -> Vec<GeneSeries> {
    (0..12u32)
        .map(|g| {
            let mut rng = Mulberry32::new(g);
            let values = (0..48)
                .map(|t| (t as f64 * (0.3 + 0.05 * f64::from(g))).sin() + 0.3 * rng.next_gaussian())
                .collect();
            let category = if g % 2 == 0 { GeneCategory::Clock } else { GeneCategory::Target };
            GeneSeries::new(format!("g{g}"), category, values)
        })
        .collect()
}

fn scanner(strategy: ExecutionStrategy) -> BatchScanner {
    let config = EngineConfig::default().with_seed(7).with_resampling(ResamplingConfig {
        bootstrap_iterations: 60,
        ..ResamplingConfig::default()
    });
    let analyzer = GeneAnalyzer::from_config(&config)
        .unwrap()
        .with_bootstrap(&config)
        .unwrap();
    BatchScanner::new(analyzer).with_strategy(strategy)
}

fn fingerprint(report: &ScanReport) -> Vec<(String, u64, u64, u64)> {
    report
        .analyses()
        .map(|a| {
            let ci = &a.bootstrap.as_ref().unwrap().method_interval;
            (
                a.gene_id.clone(),
                a.fit.eigenvalue_modulus.to_bits(),
                ci.lower.to_bits(),
                ci.upper.to_bits(),
            )
        })
        .collect()
}

#[test]
fn repeated_scans_are_bit_identical() {
    let genes = genes();
    let a = scanner(ExecutionStrategy::Sequential).scan(&genes, &CancellationToken::new());
    let b = scanner(ExecutionStrategy::Sequential).scan(&genes, &CancellationToken::new());
    assert_eq!(fingerprint(&a), fingerprint(&b));
    assert_eq!(a.analyses().count(), 12);
}

#[test]
fn parallel_matches_sequential() {
    let genes = genes();
    let sequential = scanner(ExecutionStrategy::Sequential).scan(&genes, &CancellationToken::new());
    let parallel = scanner(ExecutionStrategy::Parallel).scan(&genes, &CancellationToken::new());
    assert_eq!(fingerprint(&sequential), fingerprint(&parallel));
}

#[test]
fn gene_result_does_not_depend_on_neighbours() {
    let all = genes();
    let full = scanner(ExecutionStrategy::Sequential).scan(&all, &CancellationToken::new());
    let prefix = scanner(ExecutionStrategy::Sequential).scan(&all[..5], &CancellationToken::new());
    assert_eq!(fingerprint(&prefix)[..], fingerprint(&full)[..5]);
}

#[test]
fn cancelled_scan_returns_nothing_partial() {
    let token = CancellationToken::new();
    token.cancel();
    for strategy in [ExecutionStrategy::Sequential, ExecutionStrategy::Parallel] {
        let report = scanner(strategy).scan(&genes(), &token);
        assert!(report.cancelled);
        assert!(report.outcomes.is_empty());
        assert!(!report.is_complete());
    }
}

#[test]
fn report_and_summary_serialise() {
    let report = scanner(ExecutionStrategy::Sequential).scan(&genes()[..4], &CancellationToken::new());
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"status\":\"analyzed\""));
    assert!(matches!(report.outcomes[0], GeneOutcome::Analyzed(_)));

    let summary = DatasetSummary::from_report(&report);
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"zoneCounts\""));
    assert!(json.contains("\"gearbox\""));
}

fn with_repeated_ids(genes: Vec<GeneSeries>) -> Vec<GeneSeries> {
    genes
        .into_iter()
        .enumerate()
        .map(|(i, g)| GeneSeries {
            gene_id: format!("g{}", i % 3),
            ..g
        })
        .collect()
}

fn modulus_bits(outcome: &GeneOutcome) -> Option<u64> {
    outcome.analysis().map(|a| a.fit.eigenvalue_modulus.to_bits())
}

#[test]
fn cancelling_mid_scan_keeps_gene_positions() {
    let genes = with_repeated_ids(genes());
    let reference = scanner(ExecutionStrategy::Sequential).scan(&genes, &CancellationToken::new());
    assert!(reference.is_complete());

    let token = CancellationToken::new();
    let trip_after_fifth = |outcome: &GeneOutcome| {
        if outcome.index() == 4 {
            token.cancel();
        }
    };
    let sequential = scanner(ExecutionStrategy::Sequential).scan_with_progress(&genes, &token, trip_after_fifth);
    assert!(sequential.cancelled);
    assert_eq!(sequential.outcomes.len(), 5);
    assert_eq!(sequential.resume_from(), 5);
    assert_eq!(sequential.skipped(), (5..12).collect::<Vec<_>>());
    for (outcome, expected) in sequential.outcomes.iter().zip(&reference.outcomes) {
        assert_eq!(outcome.index(), expected.index());
        assert_eq!(modulus_bits(outcome), modulus_bits(expected));
    }

    let token = CancellationToken::new();
    let trip_after_fifth = |outcome: &GeneOutcome| {
        if outcome.index() == 4 {
            token.cancel();
        }
    };
    let parallel = scanner(ExecutionStrategy::Parallel).scan_with_progress(&genes, &token, trip_after_fifth);
    let indices: Vec<usize> = parallel.outcomes.iter().map(GeneOutcome::index).collect();
    assert!(indices.windows(2).all(|w| w[0] < w[1]), "{indices:?}");
    assert!(indices.contains(&4));
    assert_eq!(indices.len() + parallel.skipped().len(), genes.len());
    assert_eq!(parallel.cancelled, !parallel.skipped().is_empty());
    assert!(parallel.resume_from() <= indices.len());
    for outcome in &parallel.outcomes {
        let expected = &reference.outcomes[outcome.index()];
        assert_eq!(outcome.gene_id(), genes[outcome.index()].gene_id);
        assert_eq!(modulus_bits(outcome), modulus_bits(expected));
    }
}

#[test]
fn progress_sees_every_gene_once() {
    let genes = genes();
    let seen = std::sync::Mutex::new(Vec::new());
    let report = scanner(ExecutionStrategy::Parallel).scan_with_progress(&genes, &CancellationToken::new(), |o| {
        seen.lock().unwrap().push(o.index());
    });
    let mut seen = seen.into_inner().unwrap();
    seen.sort_unstable();
    assert_eq!(seen, (0..genes.len()).collect::<Vec<_>>());
    assert!(report.is_complete());
}

#[test]
fn degenerate_records_survive_a_json_round_trip() {
    let mut rng = Mulberry32::new(3);
    let mut noisy = |n: usize, period: f64| -> Vec<f64> {
        (0..n)
            .map(|t| (std::f64::consts::TAU * t as f64 / period).sin() + 0.2 * rng.next_gaussian())
            .collect()
    };
    let genes = vec![
        GeneSeries::new("arntl", GeneCategory::Clock, noisy(48, 12.0)),
        GeneSeries::new("wee1", GeneCategory::Target, noisy(48, 9.0)),
        GeneSeries::new("short", GeneCategory::Target, vec![1.0, 2.0, 3.0]),
        GeneSeries::new("tight", GeneCategory::Other, vec![1.0, 3.0, 2.0, 5.0, 4.0]),
        GeneSeries::new("flat", GeneCategory::Other, vec![2.5; 24]),
    ];
    let analyzer = GeneAnalyzer::from_config(&EngineConfig::default()).unwrap();
    let report = BatchScanner::new(analyzer).scan(&genes, &CancellationToken::new());

    let json = serde_json::to_string(&report).unwrap();
    let back: ScanReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.outcomes.len(), 5);
    assert!(matches!(
        &back.outcomes[2],
        GeneOutcome::Failed { index: 2, kind: ErrorKind::InsufficientData, .. }
    ));
    let tight = back.outcomes[3].analysis().unwrap();
    assert_eq!(tight.fit.aicc, f64::INFINITY);
    assert!(tight.fit.aic.is_finite());
    let flat = back.outcomes[4].analysis().unwrap();
    assert!(!flat.fit.is_ok());
    assert_eq!(flat.fit.aic, f64::INFINITY);
    assert_eq!(back.resume_from(), 5);

    let summary = DatasetSummary::from_report(&report);
    let json = serde_json::to_string(&summary).unwrap();
    let back: DatasetSummary = serde_json::from_str(&json).unwrap();
    let gearbox = back.gearbox.unwrap();
    assert_eq!(gearbox.clock_uncertainty, f64::INFINITY);
    assert_eq!(gearbox.uncertainty, f64::INFINITY);
    assert_eq!(gearbox.call, HierarchyCall::Uncertain);
    assert_eq!(back.failed, 1);
    assert_eq!(back.not_computable, 1);
}
