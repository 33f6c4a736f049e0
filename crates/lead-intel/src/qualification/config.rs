use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Caller-supplied decision thresholds. Scores are on the 0..=100 fit scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationThresholds {
    pub min_score: u8,
    pub approve_score: u8,
    /// Match level (0..=5) required before a high score can be approved.
    pub min_match_for_approve: u8,
    pub hot_score: u8,
    pub warm_score: u8,
}

impl Default for QualificationThresholds {
    fn default() -> Self {
        Self {
            min_score: 30,
            approve_score: 70,
            min_match_for_approve: 1,
            hot_score: 80,
            warm_score: 50,
        }
    }
}

impl QualificationThresholds {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min_score > self.approve_score || self.approve_score > 100 {
            return Err(EngineError::InvalidThresholds(format!(
                "expected min_score <= approve_score <= 100, got {} / {}",
                self.min_score, self.approve_score
            )));
        }
        if self.warm_score > self.hot_score || self.hot_score > 100 {
            return Err(EngineError::InvalidThresholds(format!(
                "expected warm_score <= hot_score <= 100, got {} / {}",
                self.warm_score, self.hot_score
            )));
        }
        if self.min_match_for_approve > 5 {
            return Err(EngineError::InvalidThresholds(format!(
                "min_match_for_approve {} exceeds the highest match level 5",
                self.min_match_for_approve
            )));
        }
        Ok(())
    }
}
