use axum::extract::State;
use axum::Json;

use crate::api::types::ApiContext;
use crate::dashboard::DashboardView;

/// `GET /api/dashboard`: financial series and stat cards.
pub async fn view(State(ctx): State<ApiContext>) -> Json<DashboardView> {
    Json(ctx.core.dashboard_view())
}
