use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use pitstop_core::aggregate::CircuitSummary;

use crate::dto::CircuitsResponse;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_circuits(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CircuitsResponse>, ApiError> {
    tracing::info!("Listing circuits");

    let circuits = state.dashboard.circuits().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load circuits");
        ApiError::from(e)
    })?;

    Ok(Json(CircuitsResponse::new(circuits)))
}

pub async fn circuit_summary(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CircuitSummary>, ApiError> {
    tracing::info!(circuit = %name, "Summarizing circuit");

    let summary = state.dashboard.summary(Some(&name)).await.map_err(|e| {
        tracing::error!(circuit = %name, error = %e, "Failed to summarize circuit");
        ApiError::from(e)
    })?;

    Ok(Json(summary))
}
