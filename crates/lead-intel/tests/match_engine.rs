use lead_intel::matching::{ConfidenceTier, FitRating, MatchEngine, MatchLevel, MatchResult};
use lead_intel::model::{
    evidence_fingerprint, CompanyIdentity, Evidence, EvidenceRecord, MatchClassification,
    SourceWeight,
};
use serde_json::json;

fn item(source: &str, company: &str, weight: SourceWeight) -> Evidence {
    Evidence::try_from(EvidenceRecord::new(source, company, weight)).expect("valid evidence")
}

fn acme() -> CompanyIdentity {
    CompanyIdentity::named("Acme SA")
}

#[test]
fn two_sources_give_level_two_at_sixty_percent() {
    let evidence = vec![
        item("jobs", "Acme SA", SourceWeight::High),
        item("techdetect", "Acme SA", SourceWeight::Medium),
    ];

    let result = MatchEngine::default()
        .evaluate(&evidence, &acme())
        .expect("evaluates");

    assert_eq!(result.match_level, MatchLevel::Double);
    assert_eq!(result.match_level.value(), 2);
    assert_eq!(result.confidence, ConfidenceTier::Media);
    assert_eq!(result.confidence_percent, 60);
    assert_eq!(result.fit_rating, FitRating::Medio);
    assert!(result.uses_product);
    assert_eq!(result.confirmed_sources, vec!["jobs", "techdetect"]);
    assert_eq!(result.total_sources, 2);
}

#[test]
fn confidence_percentages_per_level() {
    let sources = ["a", "b", "c", "d", "e"];
    let expected = [0u8, 40, 60, 75, 90, 98];

    for count in 0..=sources.len() {
        let evidence: Vec<Evidence> = sources[..count]
            .iter()
            .map(|source| item(source, "Acme SA", SourceWeight::Low))
            .collect();
        let result = MatchEngine::default()
            .evaluate(&evidence, &acme())
            .expect("evaluates");
        assert_eq!(result.confidence_percent, expected[count], "level {count}");
    }
}

#[test]
fn level_never_drops_as_sources_are_added() {
    let pool = vec![
        item("jobs", "Acme SA", SourceWeight::High),
        item("news", "Acme", SourceWeight::Low),
        item("jobs", "ACME S.A.", SourceWeight::Medium),
        item("registry", "Acme SA", SourceWeight::VeryHigh),
        item("blog", "Other Corp", SourceWeight::High),
        item("forum", "Acme SA", SourceWeight::Low),
        item("case-study", "Acme SA", SourceWeight::Medium),
        item("partner", "Acme SA", SourceWeight::Medium),
    ];

    let engine = MatchEngine::default();
    let mut previous = MatchLevel::None;
    for end in 0..=pool.len() {
        let level = engine
            .evaluate(&pool[..end], &acme())
            .expect("evaluates")
            .match_level;
        assert!(level >= previous, "level dropped at {end}");
        previous = level;
    }
    assert_eq!(previous, MatchLevel::Quintuple);
}

#[test]
fn verdict_is_invariant_under_reordering() {
    let mut evidence = vec![
        item("jobs", "Acme SA", SourceWeight::Medium),
        item("jobs", "Acme SA", SourceWeight::High),
        item("news", "Acme SA", SourceWeight::Low),
        item("techdetect", "Acme", SourceWeight::Medium),
    ];
    let engine = MatchEngine::default();
    let forward = engine.evaluate(&evidence, &acme()).expect("evaluates");

    evidence.reverse();
    let reversed = engine.evaluate(&evidence, &acme()).expect("evaluates");

    evidence.rotate_left(1);
    let rotated = engine.evaluate(&evidence, &acme()).expect("evaluates");

    assert_eq!(forward, reversed);
    assert_eq!(forward, rotated);
}

#[test]
fn duplicate_source_never_raises_level() {
    let engine = MatchEngine::default();
    let single = engine
        .evaluate(&[item("jobs", "Acme SA", SourceWeight::Low)], &acme())
        .expect("evaluates");
    let doubled = engine
        .evaluate(
            &[
                item("jobs", "Acme SA", SourceWeight::Low),
                item("JOBS", "Acme SA", SourceWeight::High),
            ],
            &acme(),
        )
        .expect("evaluates");

    assert_eq!(single.match_level, MatchLevel::Single);
    assert_eq!(doubled.match_level, MatchLevel::Single);
    assert!(doubled.uses_product);
    assert!(!single.uses_product);
}

#[test]
fn longer_company_sharing_a_prefix_is_not_confirmation() {
    let evidence = vec![
        item("jobs", "Banco do Brasil S.A.", SourceWeight::High),
        item("news", "Banco do Brasil S.A.", SourceWeight::High),
        item("registry", "Banco do Brasil S.A.", SourceWeight::High),
    ];

    let result = MatchEngine::default()
        .evaluate(&evidence, &CompanyIdentity::named("Banco Ltda"))
        .expect("evaluates");

    assert_eq!(result.match_level, MatchLevel::None);
    assert!(!result.uses_product);
}

#[test]
fn untrustworthy_rejected_and_foreign_evidence_is_ignored() {
    let mut untrusted = EvidenceRecord::new("jobs", "Acme SA", SourceWeight::VeryHigh);
    untrusted.trustworthy = false;
    let mut rejected = EvidenceRecord::new("news", "Acme SA", SourceWeight::High);
    rejected.classification = Some(MatchClassification::Rejected);
    let evidence = vec![
        Evidence::try_from(untrusted).expect("valid"),
        Evidence::try_from(rejected).expect("valid"),
        item("registry", "Globex Ltda", SourceWeight::VeryHigh),
    ];

    let result = MatchEngine::default()
        .evaluate(&evidence, &acme())
        .expect("evaluates");

    assert_eq!(result.match_level, MatchLevel::None);
    assert!(!result.uses_product);
    assert!(result.evidence.is_empty());
    assert_eq!(result.total_sources, 3);
}

#[test]
fn result_round_trips_through_json_with_literal_tokens() {
    let evidence: Vec<Evidence> = serde_json::from_value(json!([
        { "source": "jobs", "matched_company": "Acme SA", "matched_claim": "ERP", "weight": 80, "trustworthy": true },
        { "source": "registry", "matched_company": "ACME S/A", "weight": "VERY_HIGH", "trustworthy": true,
          "classification": "triple", "validation": "ai_assisted" },
        { "source": "news", "matched_company": "Acme", "weight": "LOW", "trustworthy": true },
        { "source": "blog", "matched_company": "Acme", "weight": 55, "trustworthy": true },
        { "source": "forum", "matched_company": "Acme", "weight": "MEDIUM", "trustworthy": true }
    ]))
    .expect("evidence parses");

    let result = MatchEngine::default()
        .evaluate(&evidence, &acme())
        .expect("evaluates");
    let value = serde_json::to_value(&result).expect("serializes");

    assert_eq!(value["match_level"], "QUINTUPLE");
    assert_eq!(value["confidence"], "EXCELENTE");
    assert_eq!(value["confidence_percent"], 98);
    assert_eq!(value["fit_rating"], "ALTO");
    assert_eq!(value["classification_counts"]["triple"], 1);
    assert_eq!(value["weighted_score"], 100 + 80 + 60 + 40 + 60);

    let back: MatchResult = serde_json::from_value(value).expect("deserializes");
    assert_eq!(back, result);
}

#[test]
fn malformed_evidence_cannot_be_deserialized() {
    let empty_source = serde_json::from_value::<Evidence>(json!({
        "source": " ", "matched_company": "Acme", "weight": "HIGH"
    }));
    assert!(empty_source.is_err());

    let bad_weight = serde_json::from_value::<Evidence>(json!({
        "source": "jobs", "matched_company": "Acme", "weight": "EXTREME"
    }));
    assert!(bad_weight.is_err());

    let out_of_range = serde_json::from_value::<Evidence>(json!({
        "source": "jobs", "matched_company": "Acme", "weight": 140
    }));
    assert!(out_of_range.is_err());
}

#[test]
fn fingerprint_ignores_order() {
    let first = item("jobs", "Acme SA", SourceWeight::High);
    let second = item("news", "Acme SA", SourceWeight::Low);

    assert_eq!(
        evidence_fingerprint(&[first.clone(), second.clone()]),
        evidence_fingerprint(&[second.clone(), first.clone()])
    );
    assert_ne!(
        evidence_fingerprint(&[first.clone()]),
        evidence_fingerprint(&[first, second])
    );
}
