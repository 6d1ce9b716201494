use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 5;

pub async fn recent(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIMIT);

    let exchanges = state.history.recent(limit).await?;
    Ok(Json(json!({ "exchanges": exchanges })))
}

pub async fn clear_today(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let removed = state.history.clear_today().await?;
    Ok(Json(json!({ "removed": removed })))
}

pub async fn clear_all(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let removed = state.history.clear_all().await?;
    Ok(Json(json!({ "removed": removed })))
}
