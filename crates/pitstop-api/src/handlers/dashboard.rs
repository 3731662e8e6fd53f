use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use pitstop_core::dashboard::DashboardView;
use pitstop_core::map::MapView;

use crate::dto::DashboardQuery;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_map(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<MapView>, ApiError> {
    let basemap = query.basemap()?;
    tracing::info!(circuit = ?query.circuit(), basemap = ?basemap, "Composing map");

    let map = state.dashboard.map(query.circuit(), basemap).await?;
    Ok(Json(map))
}

/// Full dashboard as JSON. An empty circuit list is a 404 here; the HTML page shows a notice instead.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let request = query.to_request()?;
    tracing::info!(circuit = ?request.circuit, basemap = ?request.basemap, "Rendering dashboard");

    let view = state.dashboard.render(&request).await.map_err(|e| {
        tracing::error!(error = %e, "Dashboard render failed");
        ApiError::from(e)
    })?;

    if view.is_empty() {
        return Err(ApiError::from(pitstop_core::PitstopError::NoCircuits));
    }

    Ok(Json(view))
}
