//! HTTP request handlers

use super::params::SearchParams;
use super::state::AppState;
use crate::error::SearchError;
use crate::search::SearchResponse;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use tracing::debug;

/// Faceted course search
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, SearchError> {
    let Query(params) = params?;
    let filters = params.into_filters(&state.settings.search)?;
    debug!("Search filters: {:?}", filters);

    let response = state.executor.search(&filters).await?;
    Ok(Json(response))
}

/// Every course, unfiltered
pub async fn all_courses(
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>, SearchError> {
    let response = state.executor.list_all().await?;
    Ok(Json(response))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "index": state.index_name(),
    }))
}
