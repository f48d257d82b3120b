//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
    /// Whether a backend credential is configured.
    pub ai_configured: bool,
    pub model: String,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let summarizer = ctx.core.summarizer().config();
    Json(HealthResponse {
        status: "ok",
        app: config::APP_NAME,
        version: config::APP_VERSION,
        ai_configured: summarizer.has_credential(),
        model: summarizer.model.clone(),
    })
}
