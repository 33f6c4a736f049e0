//! Shared vocabulary consumed by every scoring component.

mod company;
mod evidence;
pub mod normalizer;

pub use company::{CompanyIdentity, CompanyProfile};
pub use evidence::{
    evidence_fingerprint, Evidence, EvidenceRecord, MatchClassification, SourceWeight,
    ValidationMethod, WeightInput,
};
