use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let index_size = state.engine.index_size().await?;
    let provider_healthy = state.provider.health_check().await.unwrap_or(false);

    Ok(Json(json!({
        "dataset_size": state.dataset_size(),
        "index_size": index_size,
        "provider": state.provider.name(),
        "provider_healthy": provider_healthy,
    })))
}
