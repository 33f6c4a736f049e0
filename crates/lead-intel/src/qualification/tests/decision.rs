use super::common::*;
use crate::error::EngineError;
use crate::matching::MatchLevel;
use crate::qualification::{decide, Decision, QualificationThresholds, Temperature};

fn run(score: u8, sources: usize) -> (Decision, Temperature) {
    let outcome = decide(
        &fit(score),
        &matched(sources),
        &QualificationThresholds::default(),
    )
    .expect("valid thresholds");
    (outcome.decision, outcome.temperature)
}

#[test]
fn strong_score_with_confirmed_usage_is_approved() {
    let outcome = decide(&fit(85), &matched(3), &QualificationThresholds::default())
        .expect("valid thresholds");

    assert_eq!(outcome.decision, Decision::Approve);
    assert_eq!(outcome.temperature, Temperature::Hot);
    assert_eq!(outcome.match_level, MatchLevel::Triple);
    assert_eq!(outcome.score, 85);
    assert_eq!(outcome.icp_id.as_deref(), Some("core"));
    assert!(outcome.reason.contains("85"));
}

#[test]
fn strong_score_without_match_goes_to_quarantine() {
    assert_eq!(run(85, 0), (Decision::Quarantine, Temperature::Hot));
}

#[test]
fn low_score_is_discarded_whatever_the_match() {
    assert_eq!(run(29, 5), (Decision::Discard, Temperature::Cold));
}

#[test]
fn disqualified_company_is_discarded_first() {
    let mut result = fit(95);
    result.disqualified = true;
    let outcome = decide(&result, &matched(5), &QualificationThresholds::default())
        .expect("valid thresholds");
    assert_eq!(outcome.decision, Decision::Discard);
    assert_eq!(outcome.temperature, Temperature::Hot);
}

#[test]
fn ambiguous_usage_in_qualifying_range_is_quarantined() {
    assert_eq!(run(60, 1), (Decision::Quarantine, Temperature::Warm));
    assert_eq!(run(60, 2), (Decision::Quarantine, Temperature::Warm));
}

#[test]
fn qualifying_range_without_ambiguity_is_nurtured() {
    assert_eq!(run(60, 0), (Decision::Nurturing, Temperature::Warm));
    assert_eq!(run(45, 3), (Decision::Nurturing, Temperature::Cold));
}

#[test]
fn threshold_boundaries_are_inclusive() {
    assert_eq!(run(70, 1).0, Decision::Approve);
    assert_eq!(run(30, 0).0, Decision::Nurturing);
    assert_eq!(run(80, 0).1, Temperature::Hot);
    assert_eq!(run(50, 0).1, Temperature::Warm);
}

#[test]
fn custom_thresholds_are_honoured() {
    let thresholds = QualificationThresholds {
        min_score: 10,
        approve_score: 40,
        min_match_for_approve: 0,
        hot_score: 90,
        warm_score: 20,
    };
    let outcome = decide(&fit(45), &matched(0), &thresholds).expect("valid thresholds");
    assert_eq!(outcome.decision, Decision::Approve);
    assert_eq!(outcome.temperature, Temperature::Warm);
}

#[test]
fn inconsistent_thresholds_fail_fast() {
    let thresholds = QualificationThresholds {
        min_score: 80,
        approve_score: 70,
        ..QualificationThresholds::default()
    };
    let error = decide(&fit(75), &matched(1), &thresholds).expect_err("min above approve");
    assert!(matches!(error, EngineError::InvalidThresholds(_)));
}
