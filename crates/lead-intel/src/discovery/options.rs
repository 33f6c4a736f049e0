use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::normalizer::DEFAULT_NAME_THRESHOLD;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOptions {
    pub max_results: usize,
    /// Merged records scoring below this are dropped (0..=100 scale).
    pub min_similarity_score: f64,
    /// Levenshtein ratio above which two normalized names are the same company.
    pub name_threshold: f64,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_results: 50,
            min_similarity_score: 60.0,
            name_threshold: DEFAULT_NAME_THRESHOLD,
        }
    }
}

impl DiscoveryOptions {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_results == 0 {
            return Err(EngineError::InvalidOptions(
                "max_results must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.min_similarity_score) {
            return Err(EngineError::InvalidOptions(format!(
                "min_similarity_score {} outside 0..=100",
                self.min_similarity_score
            )));
        }
        if !(self.name_threshold > 0.0 && self.name_threshold <= 1.0) {
            return Err(EngineError::InvalidOptions(format!(
                "name_threshold {} outside (0, 1]",
                self.name_threshold
            )));
        }
        Ok(())
    }
}
