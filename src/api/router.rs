//! API router.
//!
//! Returns a composable `Router` with every route under `/api/`.
//! Layers (outermost → innermost): CORS → no-store header → access log.

use std::sync::Arc;

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router over a shared `CoreState`.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/dashboard", get(endpoints::dashboard::view))
        .route("/patients", get(endpoints::patients::search))
        .route("/clinical", get(endpoints::clinical::view))
        .route("/clinical/select", post(endpoints::clinical::select))
        .route("/clinical/messages", post(endpoints::clinical::send))
        .route("/admin", get(endpoints::admin::view))
        .route("/admin/reports", post(endpoints::admin::generate))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        // Responses carry patient data.
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive());

    Router::new().nest("/api", routes)
}
