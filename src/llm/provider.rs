use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::ApiError;

/// A hosted model endpoint that can complete chats and embed text.
///
/// Both operations are single synchronous calls; failures surface as
/// `ApiError::Upstream` and are rendered as a generic error at the request
/// boundary. No retry or fallback policy lives behind this trait.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// check if the provider is healthy/reachable
    async fn health_check(&self) -> Result<bool, ApiError>;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, ApiError>;

    /// generate embeddings, one vector per input
    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, ApiError>;
}
