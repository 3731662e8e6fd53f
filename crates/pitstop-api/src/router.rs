use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Dashboard page
        .route("/", get(handlers::dashboard_page))

        // Health
        .route("/health", get(handlers::health_check))

        // Circuits
        .route("/api/v1/circuits", get(handlers::list_circuits))
        .route("/api/v1/circuits/{name}/summary", get(handlers::circuit_summary))

        // Map and full dashboard
        .route("/api/v1/map", get(handlers::get_map))
        .route("/api/v1/dashboard", get(handlers::get_dashboard))
        .route("/api/v1/basemaps", get(handlers::list_basemaps))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
