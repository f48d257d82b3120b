//! Admin & finance endpoints.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::admin::AdminView;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::ReportTab;

#[derive(Deserialize)]
pub struct GenerateReportRequest {
    pub tab: ReportTab,
}

/// `GET /api/admin`
pub async fn view(State(ctx): State<ApiContext>) -> Result<Json<AdminView>, ApiError> {
    Ok(Json(ctx.core.admin_view()?))
}

/// `POST /api/admin/reports`: generate and store the report for `tab`.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Json(req): Json<GenerateReportRequest>,
) -> Result<Json<AdminView>, ApiError> {
    let core = ctx.core.clone();
    let view = tokio::task::spawn_blocking(move || core.generate_report(req.tab)).await??;
    Ok(Json(view))
}
