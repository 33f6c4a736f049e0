//! Product-usage verdicts built from weighted, per-source deduplicated evidence.

mod dedup;
mod levels;

pub use levels::{ConfidenceTier, FitRating, MatchLevel};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;
use crate::model::normalizer::{normalize_label, DEFAULT_NAME_THRESHOLD};
use crate::model::{CompanyIdentity, Evidence, MatchClassification};
use dedup::IdentityMatcher;

/// Level from which several independent low-weight sources count as usage.
const CORROBORATED_LEVEL: MatchLevel = MatchLevel::Triple;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum normalized Levenshtein ratio for two company names to be equal.
    pub name_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name_threshold: DEFAULT_NAME_THRESHOLD,
        }
    }
}

/// Classification tallies over the confirmed source representatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounts {
    pub triple: usize,
    pub double: usize,
    pub single: usize,
}

/// Verdict for one company and one product claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub company: CompanyIdentity,
    pub uses_product: bool,
    pub match_level: MatchLevel,
    pub confidence: ConfidenceTier,
    pub confidence_percent: u8,
    pub detected_products: Vec<String>,
    pub evidence: Vec<Evidence>,
    pub confirmed_sources: Vec<String>,
    pub total_sources: usize,
    pub summary: String,
    pub fit_rating: FitRating,
    pub recommendation: String,
    pub classification_counts: ClassificationCounts,
    /// Sum of the representative weights, in collector points.
    pub weighted_score: u32,
}

impl MatchResult {
    /// Verdict for a company nobody has evidence about.
    pub fn no_evidence(company: CompanyIdentity) -> Self {
        let level = MatchLevel::None;
        Self {
            summary: format!(
                "{}: no product usage evidence found",
                company.display_name()
            ),
            recommendation: recommendation(level, false).to_string(),
            company,
            uses_product: false,
            match_level: level,
            confidence: level.confidence(),
            confidence_percent: level.confidence().percent(),
            detected_products: Vec::new(),
            evidence: Vec::new(),
            confirmed_sources: Vec::new(),
            total_sources: 0,
            fit_rating: level.fit_rating(),
            classification_counts: ClassificationCounts::default(),
            weighted_score: 0,
        }
    }
}

/// Stateless evaluator turning evidence about one company into a verdict.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        evidence: &[Evidence],
        company: &CompanyIdentity,
    ) -> Result<MatchResult, EngineError> {
        company.validate()?;

        let total_sources = evidence
            .iter()
            .map(Evidence::source_key)
            .collect::<BTreeSet<_>>()
            .len();

        let matcher = IdentityMatcher::new(company, self.config.name_threshold);
        let accepted = dedup::accepted_evidence(evidence, &matcher);
        let representatives = dedup::representatives(&accepted);

        let level = MatchLevel::from_source_count(representatives.len());
        let has_strong_source = representatives
            .values()
            .any(|item| item.weight().is_strong());
        let uses_product = (level >= MatchLevel::Single && has_strong_source)
            || level >= CORROBORATED_LEVEL;

        let confirmed_sources: Vec<String> = representatives
            .values()
            .map(|item| item.source().to_string())
            .collect();

        let mut classification_counts = ClassificationCounts::default();
        for item in representatives.values() {
            match item.classification() {
                Some(MatchClassification::Triple) => classification_counts.triple += 1,
                Some(MatchClassification::Double) => classification_counts.double += 1,
                Some(MatchClassification::Single) => classification_counts.single += 1,
                Some(MatchClassification::Rejected) | None => {}
            }
        }
        let weighted_score = representatives
            .values()
            .map(|item| u32::from(item.weight().points()))
            .sum();

        let detected_products = detected_products(&accepted);
        let confidence = level.confidence();
        let result = MatchResult {
            summary: summarize(company, level, &confirmed_sources, total_sources),
            recommendation: recommendation(level, uses_product).to_string(),
            company: company.clone(),
            uses_product,
            match_level: level,
            confidence,
            confidence_percent: confidence.percent(),
            detected_products,
            evidence: accepted.into_iter().cloned().collect(),
            confirmed_sources,
            total_sources,
            fit_rating: level.fit_rating(),
            classification_counts,
            weighted_score,
        };

        info!(
            company = %company.display_name(),
            level = ?result.match_level,
            uses_product = result.uses_product,
            confirmed = result.confirmed_sources.len(),
            consulted = total_sources,
            "product match evaluated"
        );

        Ok(result)
    }
}

/// Distinct claim strings; the lexicographically smallest spelling wins per claim.
fn detected_products(accepted: &[&Evidence]) -> Vec<String> {
    let mut products: BTreeMap<String, String> = BTreeMap::new();
    for item in accepted {
        let claim = item.matched_claim();
        let key = normalize_label(claim);
        if key.is_empty() {
            continue;
        }
        products
            .entry(key)
            .and_modify(|current| {
                if claim < current.as_str() {
                    *current = claim.to_string();
                }
            })
            .or_insert_with(|| claim.to_string());
    }
    products.into_values().collect()
}

fn summarize(
    company: &CompanyIdentity,
    level: MatchLevel,
    confirmed_sources: &[String],
    total_sources: usize,
) -> String {
    let confidence = level.confidence();
    if confirmed_sources.is_empty() {
        return format!(
            "{}: no confirming source among {} consulted",
            company.display_name(),
            total_sources
        );
    }
    format!(
        "{}: {} confirmed source(s) ({}) out of {} consulted; confidence {} ({}%)",
        company.display_name(),
        confirmed_sources.len(),
        confirmed_sources.join(", "),
        total_sources,
        confidence.label(),
        confidence.percent()
    )
}

fn recommendation(level: MatchLevel, uses_product: bool) -> &'static str {
    match (level, uses_product) {
        (MatchLevel::None, _) => "No usage evidence: treat as a greenfield opportunity",
        (level, true) if level >= MatchLevel::Quadruple => {
            "Usage confirmed by several independent sources: handle as an installed-base account"
        }
        (_, true) => "Usage likely: confirm the installed product in a discovery call",
        (_, false) => "Only weak signals: collect stronger evidence before acting",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EvidenceRecord, SourceWeight};

    fn item(source: &str, weight: SourceWeight, claim: &str) -> Evidence {
        let mut record = EvidenceRecord::new(source, "Acme SA", weight);
        record.matched_claim = claim.to_string();
        Evidence::try_from(record).expect("valid evidence")
    }

    #[test]
    fn empty_evidence_is_a_none_verdict() {
        let engine = MatchEngine::default();
        let result = engine
            .evaluate(&[], &CompanyIdentity::named("Acme SA"))
            .expect("empty evidence is not an error");

        assert_eq!(result.match_level, MatchLevel::None);
        assert_eq!(result.confidence, ConfidenceTier::None);
        assert_eq!(result.confidence_percent, 0);
        assert!(!result.uses_product);
        assert_eq!(result.fit_rating, FitRating::Nenhum);
    }

    #[test]
    fn identity_without_name_or_tax_id_fails_fast() {
        let engine = MatchEngine::default();
        let error = engine
            .evaluate(&[], &CompanyIdentity::default())
            .expect_err("identity required");
        assert!(matches!(error, EngineError::InvalidIdentity(_)));
    }

    #[test]
    fn three_weak_sources_count_as_usage() {
        let engine = MatchEngine::default();
        let evidence = vec![
            item("news", SourceWeight::Low, "ERP"),
            item("blog", SourceWeight::Medium, "ERP"),
            item("forum", SourceWeight::Low, "ERP"),
        ];
        let result = engine
            .evaluate(&evidence, &CompanyIdentity::named("Acme SA"))
            .expect("evaluates");
        assert_eq!(result.match_level, MatchLevel::Triple);
        assert!(result.uses_product);
    }

    #[test]
    fn two_weak_sources_are_not_usage() {
        let engine = MatchEngine::default();
        let evidence = vec![
            item("news", SourceWeight::Low, "ERP"),
            item("blog", SourceWeight::Medium, "ERP"),
        ];
        let result = engine
            .evaluate(&evidence, &CompanyIdentity::named("Acme SA"))
            .expect("evaluates");
        assert_eq!(result.match_level, MatchLevel::Double);
        assert!(!result.uses_product);
    }

    #[test]
    fn detected_products_are_deduplicated() {
        let engine = MatchEngine::default();
        let evidence = vec![
            item("jobs", SourceWeight::High, "Protheus"),
            item("news", SourceWeight::Low, "protheus"),
            item("news", SourceWeight::Low, "Fluig"),
        ];
        let result = engine
            .evaluate(&evidence, &CompanyIdentity::named("Acme SA"))
            .expect("evaluates");
        assert_eq!(
            result.detected_products,
            vec!["Fluig".to_string(), "Protheus".to_string()]
        );
        assert_eq!(result.evidence.len(), 3);
        assert_eq!(result.weighted_score, 80 + 40);
    }
}
