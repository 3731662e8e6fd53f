use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::dto::DashboardQuery;
use crate::error::ApiError;
use crate::page::PageRenderer;
use crate::state::AppState;

/// The HTML dashboard. Every form change reloads the page and re-runs the pipeline.
pub async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let request = match query.to_request() {
        Ok(request) => request,
        Err(e) => return error_page(&state.pages, ApiError::from(e)),
    };

    let view = match state.dashboard.render(&request).await {
        Ok(view) => view,
        Err(e) => {
            tracing::error!(error = %e, "Dashboard page render failed");
            return error_page(&state.pages, ApiError::from(e));
        }
    };

    match state.pages.render_dashboard(&view) {
        Ok(body) => Html(body).into_response(),
        Err(e) => template_failure(e),
    }
}

fn error_page(pages: &PageRenderer, err: ApiError) -> Response {
    match pages.render_error(&err.message, err.details.as_deref()) {
        Ok(body) => (err.status, Html(body)).into_response(),
        Err(e) => template_failure(e),
    }
}

fn template_failure(err: handlebars::RenderError) -> Response {
    tracing::error!(error = %err, "Page template failed to render");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
}
