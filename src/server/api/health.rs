// Health endpoint - liveness probe for the front end and scripts

use crate::config::VERSION;
use crate::server::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub version: &'static str,
    /// Whether previews are generated on write
    pub screenshots: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        version: VERSION,
        screenshots: state.renderer.is_ready(),
    })
}
