//! Similar-company discovery: merges candidate pools from several providers into
//! one deduplicated ranking.
//!
//! The merge is a deterministic reduction: records are put in a canonical order
//! before grouping, so the same pools in any order produce the same ranking, and
//! feeding a ranking back in as a pool reproduces it unchanged.

mod import;
mod merge;
mod options;
mod stats;

pub use import::{
    apollo_pool_from_path, apollo_pool_from_reader, CandidateImportError, APOLLO_PROVIDER,
};
pub use options::DiscoveryOptions;
pub use stats::{DiscoveryStatistics, SimilarityTier, TierCounts};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;
use crate::model::normalizer::normalize_name;
use crate::model::CompanyProfile;
use merge::IdentityKey;

/// One provider's view of a company, with its raw relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub profile: CompanyProfile,
    pub similarity_score: f64,
    #[serde(default)]
    pub sources: BTreeSet<String>,
}

impl CandidateRecord {
    pub fn new(source: impl Into<String>, profile: CompanyProfile, similarity_score: f64) -> Self {
        let mut sources = BTreeSet::new();
        let source: String = source.into();
        let source = source_tag(&source);
        if !source.is_empty() {
            sources.insert(source);
        }
        Self {
            profile,
            similarity_score,
            sources,
        }
    }
}

/// Records gathered from one provider. The provider tags records that carry no
/// source tags of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub provider: String,
    #[serde(default)]
    pub records: Vec<CandidateRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredCompany {
    pub profile: CompanyProfile,
    pub similarity_score: f64,
    pub sources: Vec<String>,
    pub tier: SimilarityTier,
}

impl From<DiscoveredCompany> for CandidateRecord {
    fn from(company: DiscoveredCompany) -> Self {
        Self {
            profile: company.profile,
            similarity_score: company.similarity_score,
            sources: company.sources.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub results: Vec<DiscoveredCompany>,
    pub statistics: DiscoveryStatistics,
    /// Records received across all pools, before merging.
    pub candidates_considered: usize,
}

impl DiscoveryReport {
    /// Re-expresses the ranking as a pool so it can be merged again.
    pub fn into_pool(self, provider: impl Into<String>) -> CandidatePool {
        CandidatePool {
            provider: provider.into(),
            records: self.results.into_iter().map(CandidateRecord::from).collect(),
        }
    }
}

fn source_tag(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Merges `pools` into a ranking of companies similar to `target`.
pub fn discover(
    target: &CompanyProfile,
    pools: &[CandidatePool],
    options: &DiscoveryOptions,
) -> Result<DiscoveryReport, EngineError> {
    options.validate()?;

    let target_key = IdentityKey::of_identity(&target.identity);
    let mut candidates = Vec::new();
    let mut excluded = 0usize;
    for pool in pools {
        let provider = source_tag(&pool.provider);
        for record in &pool.records {
            if !record.similarity_score.is_finite() || record.similarity_score < 0.0 {
                return Err(EngineError::InvalidOptions(format!(
                    "candidate '{}' from '{}' has similarity score {}",
                    record.profile.identity.display_name(),
                    pool.provider,
                    record.similarity_score
                )));
            }

            let mut record = record.clone();
            record.sources = record
                .sources
                .iter()
                .map(|tag| source_tag(tag))
                .filter(|tag| !tag.is_empty())
                .collect();
            if record.sources.is_empty() && !provider.is_empty() {
                record.sources.insert(provider.clone());
            }

            if target_key.is_same_entity(&IdentityKey::of(&record), options.name_threshold) {
                excluded += 1;
                continue;
            }
            candidates.push(record);
        }
    }
    let candidates_considered = candidates.len() + excluded;

    let merged = merge::merge_records(candidates, options.name_threshold);
    let merged_count = merged.len();

    let mut ranked: Vec<CandidateRecord> = merged
        .into_iter()
        .filter(|record| record.similarity_score >= options.min_similarity_score)
        .collect();
    ranked.sort_by(|left, right| {
        right
            .similarity_score
            .total_cmp(&left.similarity_score)
            .then_with(|| {
                normalize_name(&left.profile.identity.display_name())
                    .cmp(&normalize_name(&right.profile.identity.display_name()))
            })
            .then_with(|| {
                left.profile
                    .identity
                    .normalized_tax_id()
                    .cmp(&right.profile.identity.normalized_tax_id())
            })
            .then_with(|| {
                serde_json::to_string(left)
                    .unwrap_or_default()
                    .cmp(&serde_json::to_string(right).unwrap_or_default())
            })
    });
    ranked.truncate(options.max_results);

    let results: Vec<DiscoveredCompany> = ranked
        .into_iter()
        .map(|record| DiscoveredCompany {
            tier: SimilarityTier::from_score(record.similarity_score),
            sources: record.sources.into_iter().collect(),
            similarity_score: record.similarity_score,
            profile: record.profile,
        })
        .collect();
    let statistics = DiscoveryStatistics::collect(&results);

    info!(
        target = %target.identity.display_name(),
        considered = candidates_considered,
        excluded,
        merged = merged_count,
        returned = results.len(),
        "discovery finished"
    );

    Ok(DiscoveryReport {
        results,
        statistics,
        candidates_considered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(provider: &str, records: Vec<(&str, &str, f64)>) -> CandidatePool {
        CandidatePool {
            provider: provider.to_string(),
            records: records
                .into_iter()
                .map(|(name, domain, score)| {
                    let mut profile = CompanyProfile::named(name);
                    profile.domain = Some(domain.to_string());
                    CandidateRecord {
                        profile,
                        similarity_score: score,
                        sources: BTreeSet::new(),
                    }
                })
                .collect(),
        }
    }

    #[test]
    fn target_is_excluded() {
        let target = CompanyProfile::named("Acme Industria SA");
        let pools = vec![pool(
            "web",
            vec![
                ("ACME INDUSTRIA", "acme.com", 95.0),
                ("Beta Comercio", "beta.com", 75.0),
            ],
        )];

        let report = discover(&target, &pools, &DiscoveryOptions::default()).expect("runs");
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.candidates_considered, 2);
        assert_eq!(
            report.results[0].profile.identity.legal_name.as_deref(),
            Some("Beta Comercio")
        );
    }

    #[test]
    fn below_minimum_and_beyond_limit_are_dropped() {
        let target = CompanyProfile::named("Target");
        let pools = vec![pool(
            "web",
            vec![
                ("Alpha", "alpha.com", 90.0),
                ("Bravo", "bravo.com", 80.0),
                ("Charlie", "charlie.com", 70.0),
                ("Delta", "delta.com", 59.9),
            ],
        )];
        let options = DiscoveryOptions {
            max_results: 2,
            ..DiscoveryOptions::default()
        };

        let report = discover(&target, &pools, &options).expect("runs");
        let names: Vec<String> = report
            .results
            .iter()
            .map(|company| company.profile.identity.display_name())
            .collect();
        assert_eq!(names, vec!["Alpha", "Bravo"]);
        assert_eq!(report.statistics.count, 2);
        assert_eq!(report.statistics.average, 85.0);
        assert_eq!(report.statistics.tiers.excellent, 1);
        assert_eq!(report.statistics.tiers.premium, 1);
    }

    #[test]
    fn empty_pools_are_not_an_error() {
        let report = discover(&CompanyProfile::named("Target"), &[], &DiscoveryOptions::default())
            .expect("empty is fine");
        assert!(report.results.is_empty());
        assert_eq!(report.statistics, DiscoveryStatistics::default());
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        let pools = vec![pool("web", vec![("Alpha", "alpha.com", f64::NAN)])];
        let error = discover(
            &CompanyProfile::named("Target"),
            &pools,
            &DiscoveryOptions::default(),
        )
        .expect_err("nan score");
        assert_eq!(error.code(), "INVALID_INPUT");
    }
}
