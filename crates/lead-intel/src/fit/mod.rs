//! ICP fit scoring: weighted criteria over a company profile plus catalog recommendations.

mod catalog;
mod icp;
mod narrative;
mod rules;

pub use catalog::{CatalogProduct, ProductCatalog, Recommendation};
pub use icp::{CriterionPredicate, IcpCriterion, IcpDefinition};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::model::CompanyProfile;

/// Share of the final score one criterion produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionContribution {
    pub criterion: String,
    pub weight: f64,
    pub satisfaction: f64,
    /// Points out of 100 this criterion added to the score.
    pub points: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub icp_id: Option<String>,
    pub icp_name: Option<String>,
    pub score: u8,
    pub contributions: Vec<CriterionContribution>,
    pub recommendations: Vec<Recommendation>,
    pub narrative: String,
    /// Carried from the profile so qualification can discard upstream rejects.
    pub disqualified: bool,
}

impl FitResult {
    /// Result for a profile with no ICP configured: score 0, nothing recommended.
    pub fn unscored(profile: &CompanyProfile) -> Self {
        Self {
            icp_id: None,
            icp_name: None,
            score: 0,
            contributions: Vec::new(),
            recommendations: Vec::new(),
            narrative: format!(
                "{}: no ICP criteria configured, fit not scored.",
                profile.identity.display_name()
            ),
            disqualified: profile.disqualified,
        }
    }
}

/// Stateless scorer bound to one tenant's product catalog.
#[derive(Debug, Clone, Default)]
pub struct FitEngine {
    catalog: ProductCatalog,
}

impl FitEngine {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn score(
        &self,
        profile: &CompanyProfile,
        icp: Option<&IcpDefinition>,
    ) -> Result<FitResult, EngineError> {
        let Some(icp) = icp else {
            debug!("no ICP supplied, returning unscored fit");
            return Ok(FitResult::unscored(profile));
        };
        icp.validate()?;

        if icp.criteria.is_empty() {
            debug!(icp = %icp.id, "ICP has no criteria, returning unscored fit");
            return Ok(FitResult {
                icp_id: Some(icp.id.clone()),
                icp_name: Some(icp.name.clone()),
                ..FitResult::unscored(profile)
            });
        }

        let (contributions, score) = rules::score_profile(profile, icp);
        let recommendations = self.catalog.recommend(&profile.signals());
        let narrative = narrative::describe(
            &profile.identity.display_name(),
            icp,
            score,
            &contributions,
            &recommendations,
        );

        info!(
            icp = %icp.id,
            company = %profile.identity.display_name(),
            score,
            recommendations = recommendations.len(),
            "fit scored"
        );

        Ok(FitResult {
            icp_id: Some(icp.id.clone()),
            icp_name: Some(icp.name.clone()),
            score,
            contributions,
            recommendations,
            narrative,
            disqualified: profile.disqualified,
        })
    }
}
