use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::catalog::SearchResponse;
use crate::report::{AnalysisReport, EconomicIndicators};
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/datasets/search", get(search_datasets))
        .route("/api/indicators/{location}", get(indicators))
        .route("/api/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Run a full market analysis. The sector is the only required input.
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let sector = req.sector.trim();
    if sector.is_empty() {
        return Err(bad_request("Le secteur est requis"));
    }

    let location = req
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    info!(sector, location = location.unwrap_or("-"), "analysis requested");
    let report = state.analyzer.analyze_market(sector, location).await;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Read-only passthrough to the catalog search.
async fn search_datasets(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(bad_request("Paramètre de recherche requis"));
    }

    let data = state.catalog.search(query, 20).await;
    Ok(Json(SearchResponse { data }))
}

async fn indicators(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Json<EconomicIndicators> {
    Json(state.analyzer.economic_indicators(&location).await)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let narrative_status = if state.analyzer.backend_enabled() {
        "available"
    } else {
        "unavailable"
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "catalog_api": state.catalog.base_url(),
        "narrative_backend": narrative_status,
    }))
}
