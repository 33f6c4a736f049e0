use crate::fit::{
    CriterionPredicate, FitEngine, FitResult, IcpCriterion, IcpDefinition, ProductCatalog,
};
use crate::matching::{MatchEngine, MatchResult};
use crate::model::{CompanyIdentity, CompanyProfile, Evidence, EvidenceRecord, SourceWeight};
use crate::qualification::{LeadInput, QualificationEngine, QualificationThresholds};

pub(super) const COMPANY: &str = "Acme Distribuidora SA";

pub(super) fn fit(score: u8) -> FitResult {
    FitResult {
        icp_id: Some("core".to_string()),
        icp_name: Some("Core accounts".to_string()),
        score,
        contributions: Vec::new(),
        recommendations: Vec::new(),
        narrative: String::new(),
        disqualified: false,
    }
}

pub(super) fn evidence_from(sources: usize) -> Vec<Evidence> {
    (0..sources)
        .map(|index| {
            Evidence::try_from(EvidenceRecord::new(
                format!("source-{index}"),
                COMPANY,
                SourceWeight::High,
            ))
            .expect("valid evidence")
        })
        .collect()
}

/// Real match verdict with `sources` distinct confirming sources.
pub(super) fn matched(sources: usize) -> MatchResult {
    MatchEngine::default()
        .evaluate(&evidence_from(sources), &CompanyIdentity::named(COMPANY))
        .expect("valid identity")
}

pub(super) fn industry_icp(id: &str, industry: &str) -> IcpDefinition {
    IcpDefinition::new(id, id.to_uppercase()).with_criterion(IcpCriterion::new(
        1.0,
        CriterionPredicate::Industry {
            values: vec![industry.to_string()],
        },
    ))
}

pub(super) fn retail_profile() -> CompanyProfile {
    let mut profile = CompanyProfile::named(COMPANY);
    profile.identity.sector = Some("Retail".to_string());
    profile
}

pub(super) fn lead(profile: CompanyProfile, sources: usize) -> LeadInput {
    LeadInput {
        profile,
        evidence: evidence_from(sources),
    }
}

pub(super) fn engine() -> QualificationEngine {
    QualificationEngine::new(
        MatchEngine::default(),
        FitEngine::new(ProductCatalog::default()),
        QualificationThresholds::default(),
    )
    .expect("default thresholds are valid")
}
