//! Axum router wiring.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::app_state::AppState;
use crate::http::handlers;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.cfg().server.max_body_bytes;
    Router::new()
        .route("/api/metrics", post(handlers::query_metrics))
        .route("/api/metrics/store", post(handlers::store_metrics))
        .route("/api/metrics/projectNames", get(handlers::project_names))
        .route("/api/metrics/:project/metricsNames", get(handlers::metric_names))
        .route("/metrics", get(handlers::render_metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
