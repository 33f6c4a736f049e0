use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Trust placed in the kind of source an evidence item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceWeight {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl SourceWeight {
    /// Numeric weight used by the evidence collectors (official filings = 100).
    pub fn points(self) -> u16 {
        match self {
            SourceWeight::VeryHigh => 100,
            SourceWeight::High => 80,
            SourceWeight::Medium => 60,
            SourceWeight::Low => 40,
        }
    }

    pub fn from_points(points: u16) -> Result<Self, EngineError> {
        match points {
            100 => Ok(SourceWeight::VeryHigh),
            75..=99 => Ok(SourceWeight::High),
            50..=74 => Ok(SourceWeight::Medium),
            1..=49 => Ok(SourceWeight::Low),
            other => Err(EngineError::InvalidEvidence(format!(
                "source weight {other} outside 1..=100"
            ))),
        }
    }

    pub fn is_strong(self) -> bool {
        matches!(self, SourceWeight::VeryHigh | SourceWeight::High)
    }

    pub fn token(self) -> &'static str {
        match self {
            SourceWeight::VeryHigh => "VERY_HIGH",
            SourceWeight::High => "HIGH",
            SourceWeight::Medium => "MEDIUM",
            SourceWeight::Low => "LOW",
        }
    }
}

impl fmt::Display for SourceWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SourceWeight {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "VERY_HIGH" => Ok(SourceWeight::VeryHigh),
            "HIGH" => Ok(SourceWeight::High),
            "MEDIUM" => Ok(SourceWeight::Medium),
            "LOW" => Ok(SourceWeight::Low),
            _ => Err(EngineError::InvalidEvidence(format!(
                "unknown source weight '{value}'"
            ))),
        }
    }
}

/// Raw weight as supplied by collectors: either the enum token or numeric points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Points(u16),
    Token(String),
}

impl Default for WeightInput {
    fn default() -> Self {
        WeightInput::Token(String::new())
    }
}

impl From<SourceWeight> for WeightInput {
    fn from(weight: SourceWeight) -> Self {
        WeightInput::Token(weight.token().to_string())
    }
}

impl TryFrom<&WeightInput> for SourceWeight {
    type Error = EngineError;

    fn try_from(value: &WeightInput) -> Result<Self, Self::Error> {
        match value {
            WeightInput::Points(points) => SourceWeight::from_points(*points),
            WeightInput::Token(token) => token.parse(),
        }
    }
}

/// How many claim elements (company, vendor, product) co-occurred in the snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchClassification {
    Rejected,
    Single,
    Double,
    Triple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMethod {
    Basic,
    AiAssisted,
}

/// Unvalidated evidence as it arrives from a collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub source: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    pub matched_company: String,
    #[serde(default)]
    pub matched_claim: String,
    #[serde(default)]
    pub context: String,
    pub weight: WeightInput,
    #[serde(default)]
    pub observed_at: DateTime<Utc>,
    #[serde(default)]
    pub trustworthy: bool,
    #[serde(default)]
    pub classification: Option<MatchClassification>,
    #[serde(default)]
    pub validation: Option<ValidationMethod>,
}

impl EvidenceRecord {
    pub fn new(
        source: impl Into<String>,
        matched_company: impl Into<String>,
        weight: SourceWeight,
    ) -> Self {
        Self {
            source: source.into(),
            matched_company: matched_company.into(),
            weight: weight.into(),
            trustworthy: true,
            ..Self::default()
        }
    }
}

/// One observed fact supporting a claim about a company. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EvidenceRecord")]
pub struct Evidence {
    source: String,
    category: String,
    url: String,
    snippet: String,
    matched_company: String,
    matched_claim: String,
    context: String,
    weight: SourceWeight,
    observed_at: DateTime<Utc>,
    trustworthy: bool,
    classification: Option<MatchClassification>,
    validation: Option<ValidationMethod>,
}

impl TryFrom<EvidenceRecord> for Evidence {
    type Error = EngineError;

    fn try_from(record: EvidenceRecord) -> Result<Self, Self::Error> {
        let source = record.source.trim().to_string();
        if source.is_empty() {
            return Err(EngineError::InvalidEvidence(
                "evidence source must not be empty".to_string(),
            ));
        }
        let matched_company = record.matched_company.trim().to_string();
        if matched_company.is_empty() {
            return Err(EngineError::InvalidEvidence(format!(
                "evidence from '{source}' has no matched company name"
            )));
        }
        let weight = SourceWeight::try_from(&record.weight)?;

        Ok(Self {
            source,
            category: record.category,
            url: record.url,
            snippet: record.snippet,
            matched_company,
            matched_claim: record.matched_claim.trim().to_string(),
            context: record.context,
            weight,
            observed_at: record.observed_at,
            trustworthy: record.trustworthy,
            classification: record.classification,
            validation: record.validation,
        })
    }
}

impl From<Evidence> for EvidenceRecord {
    fn from(evidence: Evidence) -> Self {
        Self {
            source: evidence.source,
            category: evidence.category,
            url: evidence.url,
            snippet: evidence.snippet,
            matched_company: evidence.matched_company,
            matched_claim: evidence.matched_claim,
            context: evidence.context,
            weight: evidence.weight.into(),
            observed_at: evidence.observed_at,
            trustworthy: evidence.trustworthy,
            classification: evidence.classification,
            validation: evidence.validation,
        }
    }
}

impl Evidence {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn matched_company(&self) -> &str {
        &self.matched_company
    }

    pub fn matched_claim(&self) -> &str {
        &self.matched_claim
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn weight(&self) -> SourceWeight {
        self.weight
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub fn is_trustworthy(&self) -> bool {
        self.trustworthy
    }

    pub fn classification(&self) -> Option<MatchClassification> {
        self.classification
    }

    pub fn validation(&self) -> Option<ValidationMethod> {
        self.validation
    }

    /// Source identifier folded for per-source deduplication.
    pub(crate) fn source_key(&self) -> String {
        self.source.to_lowercase()
    }
}

/// Order-independent digest of an evidence set, for caller-side caches.
pub fn evidence_fingerprint(evidence: &[Evidence]) -> String {
    let mut digests: Vec<[u8; 32]> = evidence
        .iter()
        .map(|item| {
            let mut hasher = blake3::Hasher::new();
            for field in [
                item.source.as_str(),
                item.category.as_str(),
                item.url.as_str(),
                item.snippet.as_str(),
                item.matched_company.as_str(),
                item.matched_claim.as_str(),
                item.context.as_str(),
                item.weight.token(),
            ] {
                hasher.update(field.as_bytes());
                hasher.update(&[0]);
            }
            hasher.update(item.observed_at.to_rfc3339().as_bytes());
            hasher.update(&[item.trustworthy as u8]);
            hasher.update(format!("{:?}{:?}", item.classification, item.validation).as_bytes());
            *hasher.finalize().as_bytes()
        })
        .collect();
    digests.sort_unstable();

    let mut combined = blake3::Hasher::new();
    for digest in &digests {
        combined.update(digest);
    }
    combined.finalize().to_hex().to_string()
}
