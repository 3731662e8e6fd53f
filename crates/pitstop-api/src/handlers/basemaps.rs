use std::sync::Arc;

use axum::{extract::State, Json};
use pitstop_core::map::Basemap;

use crate::dto::BasemapInfo;
use crate::state::AppState;

pub async fn list_basemaps(State(state): State<Arc<AppState>>) -> Json<Vec<BasemapInfo>> {
    let default = state.dashboard.default_basemap();
    Json(Basemap::ALL.iter().map(|b| BasemapInfo::new(*b, default)).collect())
}
