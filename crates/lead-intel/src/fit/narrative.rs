use super::catalog::Recommendation;
use super::icp::IcpDefinition;
use super::CriterionContribution;

const STRONG_BAND: u8 = 70;
const MODERATE_BAND: u8 = 50;

pub(crate) fn score_band(score: u8) -> &'static str {
    if score >= STRONG_BAND {
        "high"
    } else if score >= MODERATE_BAND {
        "moderate"
    } else {
        "low"
    }
}

pub(crate) fn describe(
    company: &str,
    icp: &IcpDefinition,
    score: u8,
    contributions: &[CriterionContribution],
    recommendations: &[Recommendation],
) -> String {
    let mut narrative = format!(
        "{company} shows {} fit ({score}/100) with ICP '{}'.",
        score_band(score),
        icp.name
    );

    let mut strongest: Vec<&CriterionContribution> = contributions
        .iter()
        .filter(|contribution| contribution.points > 0.0)
        .collect();
    strongest.sort_by(|left, right| {
        right
            .points
            .total_cmp(&left.points)
            .then_with(|| left.criterion.cmp(&right.criterion))
    });
    if !strongest.is_empty() {
        let names: Vec<&str> = strongest
            .iter()
            .take(3)
            .map(|contribution| contribution.criterion.as_str())
            .collect();
        narrative.push_str(&format!(" Strongest criteria: {}.", names.join(", ")));
    }

    let unmet: Vec<&str> = contributions
        .iter()
        .filter(|contribution| contribution.weight > 0.0 && contribution.satisfaction == 0.0)
        .map(|contribution| contribution.criterion.as_str())
        .collect();
    if !unmet.is_empty() {
        narrative.push_str(&format!(" Unmet: {}.", unmet.join(", ")));
    }

    if !recommendations.is_empty() {
        let names: Vec<&str> = recommendations
            .iter()
            .take(3)
            .map(|recommendation| recommendation.name.as_str())
            .collect();
        narrative.push_str(&format!(" Suggested offers: {}.", names.join(", ")));
    }

    narrative
}
