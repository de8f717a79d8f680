//! Property tests for confidence scoring and gap calls

use par_diagnostics::{
    ConfidenceBand, ConfidenceScore, DiagnosticFlag, DiagnosticKind, GearboxGap, HierarchyCall, Severity,
};
use proptest::prelude::*;

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![Just(Severity::Info), Just(Severity::Warning), Just(Severity::Critical)]
}

fn flags(severities: &[Severity]) -> Vec<DiagnosticFlag> {
    severities
        .iter()
        .map(|&s| DiagnosticFlag::new(DiagnosticKind::Nonlinearity, s, "synthetic"))
        .collect()
}

proptest! {
    #[test]
    fn adding_a_flag_never_raises_the_score(
        existing in prop::collection::vec(severity(), 0..8),
        extra in severity(),
    ) {
        let before = ConfidenceScore::from_flags(&flags(&existing));
        let mut more = existing.clone();
        more.push(extra);
        let after = ConfidenceScore::from_flags(&flags(&more));
        prop_assert!(after.score <= before.score);
        prop_assert!(after.band <= before.band);
    }

    #[test]
    fn escalating_severity_never_raises_the_score(
        existing in prop::collection::vec(severity(), 0..8),
    ) {
        let base = ConfidenceScore::from_flags(&flags(&existing));
        let escalated: Vec<Severity> = existing
            .iter()
            .map(|s| match s {
                Severity::Info => Severity::Warning,
                _ => Severity::Critical,
            })
            .collect();
        prop_assert!(ConfidenceScore::from_flags(&flags(&escalated)).score <= base.score);
    }

    #[test]
    fn score_stays_in_range(existing in prop::collection::vec(severity(), 0..20)) {
        let score = ConfidenceScore::from_flags(&flags(&existing));
        prop_assert!(score.score <= 100);
        prop_assert_eq!(score.band, ConfidenceBand::from_score(score.score));
    }

    #[test]
    fn uncertain_whenever_gap_below_uncertainty(
        clock in 0.0f64..1.5,
        target in 0.0f64..1.5,
        s1 in 0.0f64..0.5,
        s2 in 0.0f64..0.5,
    ) {
        let gap = GearboxGap::new(clock, target, s1, s2);
        if gap.gap.abs() < gap.uncertainty {
            prop_assert_eq!(gap.call, HierarchyCall::Uncertain);
        } else if gap.gap > 0.0 {
            prop_assert_eq!(gap.call, HierarchyCall::Preserved);
        } else if gap.gap < 0.0 {
            prop_assert_eq!(gap.call, HierarchyCall::Reversed);
        }
    }
}
