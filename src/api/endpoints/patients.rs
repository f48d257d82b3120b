//! Patient search for the clinical sidebar.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::types::ApiContext;
use crate::models::Patient;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct PatientListResponse {
    pub query: String,
    pub patients: Vec<Patient>,
}

/// `GET /api/patients?q=`: name/MRN filter, store order. Empty `q` lists all.
pub async fn search(
    State(ctx): State<ApiContext>,
    Query(params): Query<SearchParams>,
) -> Json<PatientListResponse> {
    let patients = ctx.core.search_patients(&params.q);
    Json(PatientListResponse {
        query: params.q,
        patients,
    })
}
