use serde::{Deserialize, Serialize};

use super::config::QualificationThresholds;
use crate::matching::MatchLevel;

/// Commercial routing outcome for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Quarantine,
    Nurturing,
    Discard,
}

impl Decision {
    pub fn token(self) -> &'static str {
        match self {
            Decision::Approve => "APPROVE",
            Decision::Quarantine => "QUARANTINE",
            Decision::Nurturing => "NURTURING",
            Decision::Discard => "DISCARD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
}

pub(crate) fn temperature(score: u8, thresholds: &QualificationThresholds) -> Temperature {
    if score >= thresholds.hot_score {
        Temperature::Hot
    } else if score >= thresholds.warm_score {
        Temperature::Warm
    } else {
        Temperature::Cold
    }
}

/// First matching rule wins: discard, approve, quarantine, nurturing.
pub(crate) fn decide_outcome(
    score: u8,
    level: MatchLevel,
    disqualified: bool,
    thresholds: &QualificationThresholds,
) -> (Decision, String) {
    if disqualified {
        return (
            Decision::Discard,
            "company flagged as disqualified upstream".to_string(),
        );
    }
    if score < thresholds.min_score {
        return (
            Decision::Discard,
            format!(
                "fit score {score} below minimum {}",
                thresholds.min_score
            ),
        );
    }

    let level_value = level.value();
    if score >= thresholds.approve_score {
        if level_value >= thresholds.min_match_for_approve {
            return (
                Decision::Approve,
                format!(
                    "fit score {score} meets {} and match level {level_value} meets {}",
                    thresholds.approve_score, thresholds.min_match_for_approve
                ),
            );
        }
        return (
            Decision::Quarantine,
            format!(
                "fit score {score} meets {} but match level {level_value} is below {}; manual review",
                thresholds.approve_score, thresholds.min_match_for_approve
            ),
        );
    }

    if matches!(level, MatchLevel::Single | MatchLevel::Double) {
        return (
            Decision::Quarantine,
            format!("fit score {score} qualifies but product usage is ambiguous (match level {level_value}); manual review"),
        );
    }

    (
        Decision::Nurturing,
        format!("fit score {score} qualifies without a decisive product signal (match level {level_value})"),
    )
}
