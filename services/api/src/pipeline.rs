use crate::infra::read_json_file;
use clap::Args;
use lead_intel::config::{AppConfig, EngineSettings};
use lead_intel::discovery::{apollo_pool_from_path, discover, CandidatePool, DiscoveryReport};
use lead_intel::error::AppError;
use lead_intel::fit::{FitEngine, IcpDefinition, ProductCatalog};
use lead_intel::matching::{MatchConfig, MatchEngine};
use lead_intel::qualification::{
    LeadInput, LeadQualification, QualificationEngine, QualificationThresholds,
};
use lead_intel::router::DiscoverRequest;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PipelineArgs {
    /// JSON file holding the lead, its evidence and the ICPs to score against
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Print the full qualification as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DiscoverArgs {
    /// JSON file holding the target profile, candidate pools and options
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Optional Apollo organization export merged in as an extra pool
    #[arg(long)]
    pub(crate) apollo_csv: Option<PathBuf>,
    /// Similarity score given to Apollo rows that carry none
    #[arg(long, default_value_t = 50.0)]
    pub(crate) apollo_default_score: f64,
    /// Print the full report as JSON instead of the text ranking
    #[arg(long)]
    pub(crate) json: bool,
}

/// One lead plus the context it is qualified in.
#[derive(Debug, Deserialize)]
pub(crate) struct PipelineRequest {
    pub(crate) lead: LeadInput,
    #[serde(default)]
    pub(crate) icps: Vec<IcpDefinition>,
    #[serde(default)]
    pub(crate) catalog: ProductCatalog,
    #[serde(default)]
    pub(crate) thresholds: Option<QualificationThresholds>,
    #[serde(default)]
    pub(crate) match_config: Option<MatchConfig>,
}

pub(crate) fn run_pipeline(args: PipelineArgs) -> Result<(), AppError> {
    let PipelineArgs { request, json } = args;
    let settings = AppConfig::load()?.engine;
    let request: PipelineRequest = read_json_file(&request)?;

    let outcome = qualify_request(request, &settings)?;
    if json {
        print_json(&outcome)?;
    } else {
        render_qualification(&outcome);
    }
    Ok(())
}

pub(crate) fn run_discover(args: DiscoverArgs) -> Result<(), AppError> {
    let DiscoverArgs {
        request,
        apollo_csv,
        apollo_default_score,
        json,
    } = args;
    let settings = AppConfig::load()?.engine;
    let request: DiscoverRequest = read_json_file(&request)?;
    let apollo = apollo_csv
        .map(|path| apollo_pool_from_path(path, apollo_default_score))
        .transpose()?;

    let report = discover_request(request, apollo, &settings)?;
    if json {
        print_json(&report)?;
    } else {
        render_discovery(&report);
    }
    Ok(())
}

pub(crate) fn qualify_request(
    request: PipelineRequest,
    settings: &EngineSettings,
) -> Result<LeadQualification, AppError> {
    let PipelineRequest {
        lead,
        icps,
        catalog,
        thresholds,
        match_config,
    } = request;

    let engine = QualificationEngine::new(
        MatchEngine::new(match_config.unwrap_or_else(|| settings.matching.clone())),
        FitEngine::new(catalog),
        thresholds.unwrap_or(settings.thresholds),
    )?;
    Ok(engine.qualify_lead(&lead, &icps)?)
}

pub(crate) fn discover_request(
    request: DiscoverRequest,
    apollo: Option<CandidatePool>,
    settings: &EngineSettings,
) -> Result<DiscoveryReport, AppError> {
    let DiscoverRequest {
        target,
        mut pools,
        options,
    } = request;
    pools.extend(apollo);

    let options = options.unwrap_or_else(|| settings.discovery.clone());
    Ok(discover(&target, &pools, &options)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn render_qualification(outcome: &LeadQualification) {
    let LeadQualification {
        matched,
        fit,
        decision,
    } = outcome;

    println!("Lead qualification: {}", matched.company.display_name());
    println!(
        "- Decision {} ({:?}) | fit score {} | match level {:?}",
        decision.decision.token(),
        decision.temperature,
        decision.score,
        decision.match_level
    );
    println!("  Reason: {}", decision.reason);

    println!("\nProduct usage");
    println!(
        "- {} of {} sources confirmed | confidence {} ({}%) | weighted score {}",
        matched.confirmed_sources.len(),
        matched.total_sources,
        matched.confidence.label(),
        matched.confidence_percent,
        matched.weighted_score
    );
    if !matched.detected_products.is_empty() {
        println!("  Detected: {}", matched.detected_products.join(", "));
    }
    println!("  {}", matched.summary);
    println!("  Next step: {}", matched.recommendation);

    println!("\nICP fit");
    match (&fit.icp_name, &fit.icp_id) {
        (Some(name), Some(id)) => println!("- {} [{}]: {}/100", name, id, fit.score),
        _ => println!("- No ICP configured: {}/100", fit.score),
    }
    for contribution in &fit.contributions {
        println!(
            "    - {}: {:.0}% of weight {:.1} -> {:.1} pts ({})",
            contribution.criterion,
            contribution.satisfaction * 100.0,
            contribution.weight,
            contribution.points,
            contribution.notes
        );
    }
    if fit.recommendations.is_empty() {
        println!("  Recommended products: none");
    } else {
        println!("  Recommended products:");
        for recommendation in &fit.recommendations {
            println!(
                "    {}. {} ({}) via {}",
                recommendation.rank,
                recommendation.name,
                recommendation.product_id,
                recommendation.matched_signals.join(", ")
            );
        }
    }
    if !fit.narrative.is_empty() {
        println!("  {}", fit.narrative);
    }
}

fn render_discovery(report: &DiscoveryReport) {
    let stats = &report.statistics;
    println!(
        "Similar companies: {} returned from {} candidates",
        stats.count, report.candidates_considered
    );
    if stats.count == 0 {
        return;
    }
    println!(
        "- Similarity avg {:.2} | max {:.1} | min {:.1}",
        stats.average, stats.max, stats.min
    );
    println!(
        "- Tiers: {} excellent | {} premium | {} qualified | {} potential | {} low",
        stats.tiers.excellent,
        stats.tiers.premium,
        stats.tiers.qualified,
        stats.tiers.potential,
        stats.tiers.low
    );
    println!("Ranking:");
    for (position, company) in report.results.iter().enumerate() {
        let location = match (&company.profile.city, &company.profile.state) {
            (Some(city), Some(state)) => format!(" | {city}/{state}"),
            (Some(city), None) => format!(" | {city}"),
            (None, Some(state)) => format!(" | {state}"),
            (None, None) => String::new(),
        };
        println!(
            "  {:>2}. {} | {:.1} ({:?}) | sources: {}{}",
            position + 1,
            company.profile.identity.display_name(),
            company.similarity_score,
            company.tier,
            company.sources.join(", "),
            location
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_intel::discovery::APOLLO_PROVIDER;
    use lead_intel::qualification::Decision;
    use serde_json::json;

    fn apollo_fixture() -> CandidatePool {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../crates/lead-intel/tests/fixtures/apollo_companies.csv"
        );
        apollo_pool_from_path(path, 50.0).expect("fixture imports")
    }

    #[test]
    fn pipeline_request_runs_match_fit_and_decision() {
        let request: PipelineRequest = serde_json::from_value(json!({
            "lead": {
                "profile": { "legal_name": "Varejo Centro SA", "sector": "Retail" },
                "evidence": [
                    { "source": "jobs", "matched_company": "Varejo Centro", "weight": "HIGH", "trustworthy": true },
                    { "source": "news", "matched_company": "VAREJO CENTRO S.A.", "weight": "LOW", "trustworthy": true },
                    { "source": "registry", "matched_company": "Varejo Centro", "weight": "MEDIUM", "trustworthy": true }
                ]
            },
            "icps": [
                { "id": "retail", "name": "Retail", "criteria": [
                    { "kind": "industry", "weight": 1.0, "values": ["retail"] }
                ] }
            ]
        }))
        .expect("request parses");

        let outcome = qualify_request(request, &EngineSettings::default()).expect("qualifies");

        assert_eq!(outcome.fit.score, 100);
        assert_eq!(outcome.matched.confidence_percent, 75);
        assert_eq!(outcome.decision.decision, Decision::Approve);
    }

    #[test]
    fn pipeline_request_rejects_inverted_thresholds() {
        let request: PipelineRequest = serde_json::from_value(json!({
            "lead": { "profile": { "legal_name": "Varejo Centro SA" } },
            "thresholds": { "min_score": 90, "approve_score": 40 }
        }))
        .expect("request parses");

        let err = qualify_request(request, &EngineSettings::default()).expect_err("rejected");
        assert!(matches!(err, AppError::Engine(_)));
    }

    #[test]
    fn discover_request_merges_apollo_pool() {
        let request: DiscoverRequest = serde_json::from_value(json!({
            "target": { "legal_name": "Target Varejo SA" },
            "pools": [
                { "provider": "web", "records": [
                    { "profile": { "legal_name": "ACME SA", "domain": "acme.com" }, "similarity_score": 65.0 }
                ] }
            ]
        }))
        .expect("request parses");

        let report = discover_request(request, Some(apollo_fixture()), &EngineSettings::default())
            .expect("discovers");

        let names: Vec<String> = report
            .results
            .iter()
            .map(|company| company.profile.identity.display_name())
            .collect();
        assert_eq!(names, vec!["Acme S.A.", "Globex Comercio Ltda"]);
        assert_eq!(report.results[0].sources, vec![APOLLO_PROVIDER, "web"]);
        assert_eq!(report.candidates_considered, 6);
    }
}
