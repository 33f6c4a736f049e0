use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Decision, LeadInput, LeadQualification, QualificationEngine};
use crate::fit::IcpDefinition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTallies {
    pub total: usize,
    pub approved: usize,
    pub quarantined: usize,
    pub nurturing: usize,
    pub discarded: usize,
    pub errors: usize,
}

impl BatchTallies {
    fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Approve => self.approved += 1,
            Decision::Quarantine => self.quarantined += 1,
            Decision::Nurturing => self.nurturing += 1,
            Decision::Discard => self.discarded += 1,
        }
    }
}

/// Per-lead result, in input order. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadOutcome {
    pub company: String,
    pub result: Option<LeadQualification>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<LeadOutcome>,
    pub tallies: BatchTallies,
}

pub(super) fn run(
    engine: &QualificationEngine,
    leads: &[LeadInput],
    icps: &[IcpDefinition],
) -> BatchReport {
    let mut tallies = BatchTallies {
        total: leads.len(),
        ..BatchTallies::default()
    };
    let mut outcomes = Vec::with_capacity(leads.len());

    for lead in leads {
        let company = lead.profile.identity.display_name();
        match engine.qualify_lead(lead, icps) {
            Ok(result) => {
                tallies.record(result.decision.decision);
                outcomes.push(LeadOutcome {
                    company,
                    result: Some(result),
                    error: None,
                });
            }
            Err(err) => {
                warn!(company = %company, error = %err, "lead skipped");
                tallies.errors += 1;
                outcomes.push(LeadOutcome {
                    company,
                    result: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    info!(
        total = tallies.total,
        approved = tallies.approved,
        quarantined = tallies.quarantined,
        nurturing = tallies.nurturing,
        discarded = tallies.discarded,
        errors = tallies.errors,
        "batch qualification finished"
    );

    BatchReport { outcomes, tallies }
}
