//! Clinical assistant endpoints.
//!
//! - `GET /api/clinical`: current chat view
//! - `POST /api/clinical/select`: choose a patient, fresh conversation
//! - `POST /api/clinical/messages`: send a message, returns the updated view

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::clinical::ClinicalView;

#[derive(Deserialize)]
pub struct SelectPatientRequest {
    pub patient_id: String,
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

pub async fn view(State(ctx): State<ApiContext>) -> Result<Json<ClinicalView>, ApiError> {
    Ok(Json(ctx.core.clinical_view()?))
}

pub async fn select(
    State(ctx): State<ApiContext>,
    Json(req): Json<SelectPatientRequest>,
) -> Result<Json<ClinicalView>, ApiError> {
    Ok(Json(ctx.core.select_patient(&req.patient_id)?))
}

/// Blocks a pool thread for the backend call; the session lock is released
/// while it runs, so `GET /api/clinical` reports `awaiting: true` meanwhile.
pub async fn send(
    State(ctx): State<ApiContext>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ClinicalView>, ApiError> {
    let core = ctx.core.clone();
    let view = tokio::task::spawn_blocking(move || core.send_message(&req.text)).await??;
    Ok(Json(view))
}
