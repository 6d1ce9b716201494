use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::dataset;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Optional caller-supplied material included in the prompt context.
    #[serde(default)]
    pub context: Option<String>,
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .qa
        .ask(&request.question, request.context.as_deref())
        .await?;

    // History is display-only; losing an entry is not worth failing the answer.
    if let Err(err) = state
        .history
        .append(request.question.trim(), &outcome.answer)
        .await
    {
        tracing::warn!("Failed to record exchange: {}", err);
    }

    Ok(Json(json!({
        "answer": outcome.answer,
        "sources": outcome.sources,
    })))
}

/// Re-read the dataset from disk and rebuild the vector index.
pub async fn reindex(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let records = dataset::load_dataset(&state.dataset_path).map_err(ApiError::internal)?;

    let indexed = state.engine.build_index(&records).await?;
    state.set_dataset_size(records.len());

    Ok(Json(json!({ "indexed": indexed })))
}
