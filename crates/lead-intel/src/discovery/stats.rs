use serde::{Deserialize, Serialize};

use super::DiscoveredCompany;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimilarityTier {
    Low,
    Potential,
    Qualified,
    Premium,
    Excellent,
}

impl SimilarityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            SimilarityTier::Excellent
        } else if score >= 70.0 {
            SimilarityTier::Premium
        } else if score >= 55.0 {
            SimilarityTier::Qualified
        } else if score >= 40.0 {
            SimilarityTier::Potential
        } else {
            SimilarityTier::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub excellent: usize,
    pub premium: usize,
    pub qualified: usize,
    pub potential: usize,
    pub low: usize,
}

/// Summary over the returned ranking. All zero when nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryStatistics {
    pub count: usize,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub tiers: TierCounts,
}

impl DiscoveryStatistics {
    pub(crate) fn collect(results: &[DiscoveredCompany]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            count: results.len(),
            max: f64::MIN,
            min: f64::MAX,
            ..Self::default()
        };
        let mut total = 0.0;
        for result in results {
            total += result.similarity_score;
            stats.max = stats.max.max(result.similarity_score);
            stats.min = stats.min.min(result.similarity_score);
            match result.tier {
                SimilarityTier::Excellent => stats.tiers.excellent += 1,
                SimilarityTier::Premium => stats.tiers.premium += 1,
                SimilarityTier::Qualified => stats.tiers.qualified += 1,
                SimilarityTier::Potential => stats.tiers.potential += 1,
                SimilarityTier::Low => stats.tiers.low += 1,
            }
        }
        stats.average = (total / results.len() as f64 * 100.0).round() / 100.0;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(SimilarityTier::from_score(85.0), SimilarityTier::Excellent);
        assert_eq!(SimilarityTier::from_score(84.9), SimilarityTier::Premium);
        assert_eq!(SimilarityTier::from_score(70.0), SimilarityTier::Premium);
        assert_eq!(SimilarityTier::from_score(55.0), SimilarityTier::Qualified);
        assert_eq!(SimilarityTier::from_score(40.0), SimilarityTier::Potential);
        assert_eq!(SimilarityTier::from_score(39.0), SimilarityTier::Low);
    }
}
