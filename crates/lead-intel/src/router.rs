use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::config::EngineSettings;
use crate::discovery::{discover, CandidatePool, DiscoveryOptions, DiscoveryReport};
use crate::error::AppError;
use crate::fit::{FitEngine, FitResult, IcpDefinition, ProductCatalog};
use crate::matching::{MatchConfig, MatchEngine, MatchResult};
use crate::model::{evidence_fingerprint, CompanyIdentity, CompanyProfile, Evidence};
use crate::qualification::{
    decide, BatchReport, LeadInput, QualificationDecision, QualificationEngine,
    QualificationThresholds,
};

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub company: CompanyIdentity,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    #[serde(default)]
    pub config: Option<MatchConfig>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub result: MatchResult,
    /// Cache key over the submitted evidence.
    pub evidence_fingerprint: String,
}

#[derive(Debug, Deserialize)]
pub struct FitRequest {
    pub profile: CompanyProfile,
    #[serde(default)]
    pub icp: Option<IcpDefinition>,
    #[serde(default)]
    pub catalog: ProductCatalog,
}

#[derive(Debug, Deserialize)]
pub struct QualifyRequest {
    pub fit: FitResult,
    #[serde(rename = "match")]
    pub matched: MatchResult,
    #[serde(default)]
    pub thresholds: Option<QualificationThresholds>,
}

#[derive(Debug, Deserialize)]
pub struct LeadsQualifyRequest {
    pub leads: Vec<LeadInput>,
    #[serde(default)]
    pub icps: Vec<IcpDefinition>,
    #[serde(default)]
    pub catalog: ProductCatalog,
    #[serde(default)]
    pub thresholds: Option<QualificationThresholds>,
    #[serde(default)]
    pub match_config: Option<MatchConfig>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverRequest {
    pub target: CompanyProfile,
    #[serde(default)]
    pub pools: Vec<CandidatePool>,
    #[serde(default)]
    pub options: Option<DiscoveryOptions>,
}

/// JSON surface over the four scoring entry points. Request fields override
/// the configured defaults in `settings`.
pub fn engine_router(settings: Arc<EngineSettings>) -> Router {
    Router::new()
        .route("/api/v1/match", post(match_handler))
        .route("/api/v1/fit", post(fit_handler))
        .route("/api/v1/qualify", post(qualify_handler))
        .route("/api/v1/leads/qualify", post(leads_qualify_handler))
        .route("/api/v1/discover", post(discover_handler))
        .with_state(settings)
}

pub(crate) async fn match_handler(
    State(settings): State<Arc<EngineSettings>>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let engine = MatchEngine::new(request.config.unwrap_or_else(|| settings.matching.clone()));
    let result = engine.evaluate(&request.evidence, &request.company)?;
    Ok(Json(MatchResponse {
        result,
        evidence_fingerprint: evidence_fingerprint(&request.evidence),
    }))
}

pub(crate) async fn fit_handler(Json(request): Json<FitRequest>) -> Result<Json<FitResult>, AppError> {
    let engine = FitEngine::new(request.catalog);
    let result = engine.score(&request.profile, request.icp.as_ref())?;
    Ok(Json(result))
}

pub(crate) async fn qualify_handler(
    State(settings): State<Arc<EngineSettings>>,
    Json(request): Json<QualifyRequest>,
) -> Result<Json<QualificationDecision>, AppError> {
    let thresholds = request.thresholds.unwrap_or(settings.thresholds);
    let decision = decide(&request.fit, &request.matched, &thresholds)?;
    Ok(Json(decision))
}

pub(crate) async fn leads_qualify_handler(
    State(settings): State<Arc<EngineSettings>>,
    Json(request): Json<LeadsQualifyRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let engine = QualificationEngine::new(
        MatchEngine::new(
            request
                .match_config
                .unwrap_or_else(|| settings.matching.clone()),
        ),
        FitEngine::new(request.catalog),
        request.thresholds.unwrap_or(settings.thresholds),
    )?;
    Ok(Json(engine.qualify_batch(&request.leads, &request.icps)))
}

pub(crate) async fn discover_handler(
    State(settings): State<Arc<EngineSettings>>,
    Json(request): Json<DiscoverRequest>,
) -> Result<Json<DiscoveryReport>, AppError> {
    let options = request
        .options
        .unwrap_or_else(|| settings.discovery.clone());
    let report = discover(&request.target, &request.pools, &options)?;
    Ok(Json(report))
}
