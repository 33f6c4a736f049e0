//! Lead qualification: fit score plus product match routed through ordered business rules.

mod batch;
mod config;
mod policy;

#[cfg(test)]
mod tests;

pub use batch::{BatchReport, BatchTallies, LeadOutcome};
pub use config::QualificationThresholds;
pub use policy::{Decision, Temperature};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;
use crate::fit::{FitEngine, FitResult, IcpDefinition};
use crate::matching::{MatchEngine, MatchLevel, MatchResult};
use crate::model::{CompanyProfile, Evidence};

/// Final routing state for one evaluation. The caller owns any transition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationDecision {
    pub decision: Decision,
    pub temperature: Temperature,
    pub icp_id: Option<String>,
    pub icp_name: Option<String>,
    pub score: u8,
    pub match_level: MatchLevel,
    pub reason: String,
}

/// Pure decision over an already computed fit and match.
pub fn decide(
    fit: &FitResult,
    matched: &MatchResult,
    thresholds: &QualificationThresholds,
) -> Result<QualificationDecision, EngineError> {
    thresholds.validate()?;

    let (decision, reason) = policy::decide_outcome(
        fit.score,
        matched.match_level,
        fit.disqualified,
        thresholds,
    );

    Ok(QualificationDecision {
        decision,
        temperature: policy::temperature(fit.score, thresholds),
        icp_id: fit.icp_id.clone(),
        icp_name: fit.icp_name.clone(),
        score: fit.score,
        match_level: matched.match_level,
        reason,
    })
}

/// One lead as submitted for qualification: its profile and the evidence gathered about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadInput {
    pub profile: CompanyProfile,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Everything produced while qualifying one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadQualification {
    pub matched: MatchResult,
    pub fit: FitResult,
    pub decision: QualificationDecision,
}

/// Runs match, fit and decision for leads against a set of ICPs.
#[derive(Debug, Clone)]
pub struct QualificationEngine {
    matcher: MatchEngine,
    fit: FitEngine,
    thresholds: QualificationThresholds,
}

impl QualificationEngine {
    pub fn new(
        matcher: MatchEngine,
        fit: FitEngine,
        thresholds: QualificationThresholds,
    ) -> Result<Self, EngineError> {
        thresholds.validate()?;
        Ok(Self {
            matcher,
            fit,
            thresholds,
        })
    }

    pub fn thresholds(&self) -> &QualificationThresholds {
        &self.thresholds
    }

    /// Scores `profile` against every ICP and keeps the best: highest score,
    /// then the primary ICP, then definition order.
    pub fn best_fit(
        &self,
        profile: &CompanyProfile,
        icps: &[IcpDefinition],
    ) -> Result<FitResult, EngineError> {
        let mut best: Option<(FitResult, bool)> = None;
        for icp in icps {
            let result = self.fit.score(profile, Some(icp))?;
            let replace = match &best {
                None => true,
                Some((current, current_primary)) => {
                    result.score > current.score
                        || (result.score == current.score && icp.primary && !current_primary)
                }
            };
            if replace {
                best = Some((result, icp.primary));
            }
        }

        match best {
            Some((result, _)) => Ok(result),
            None => self.fit.score(profile, None),
        }
    }

    pub fn qualify(
        &self,
        profile: &CompanyProfile,
        matched: &MatchResult,
        icps: &[IcpDefinition],
    ) -> Result<QualificationDecision, EngineError> {
        let fit = self.best_fit(profile, icps)?;
        decide(&fit, matched, &self.thresholds)
    }

    pub fn qualify_lead(
        &self,
        lead: &LeadInput,
        icps: &[IcpDefinition],
    ) -> Result<LeadQualification, EngineError> {
        let matched = self.matcher.evaluate(&lead.evidence, &lead.profile.identity)?;
        let fit = self.best_fit(&lead.profile, icps)?;
        let decision = decide(&fit, &matched, &self.thresholds)?;

        info!(
            company = %lead.profile.identity.display_name(),
            decision = decision.decision.token(),
            temperature = ?decision.temperature,
            score = decision.score,
            "lead qualified"
        );

        Ok(LeadQualification {
            matched,
            fit,
            decision,
        })
    }

    /// Qualifies every lead; malformed leads are counted as errors and skipped.
    pub fn qualify_batch(&self, leads: &[LeadInput], icps: &[IcpDefinition]) -> BatchReport {
        batch::run(self, leads, icps)
    }
}
