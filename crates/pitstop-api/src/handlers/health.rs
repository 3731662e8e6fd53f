use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cached = state.dashboard.loader().cached_locations().len();
    Json(HealthResponse::new(cached))
}
