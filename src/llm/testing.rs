//! Deterministic provider stub for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::errors::ApiError;

/// In-process provider with deterministic embeddings and a canned chat reply.
///
/// Embeddings are letter-frequency vectors, so identical strings always get
/// identical vectors (cosine 1.0) and unrelated strings score lower. Chat
/// requests are recorded for prompt assertions.
pub struct StubProvider {
    pub reply: String,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub fail_chat: bool,
    /// When set, the number of embed calls that still succeed; once it
    /// reaches zero every embed call fails.
    pub embed_budget: Mutex<Option<usize>>,
}

impl StubProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            chat_requests: Mutex::new(Vec::new()),
            fail_chat: false,
            embed_budget: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            chat_requests: Mutex::new(Vec::new()),
            fail_chat: true,
            embed_budget: Mutex::new(None),
        }
    }

    pub fn set_embed_budget(&self, calls: usize) {
        *self.embed_budget.lock().unwrap() = Some(calls);
    }

    pub fn letter_frequency_embedding(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; 26];
        for c in text.to_lowercase().chars() {
            if c.is_ascii_lowercase() {
                vector[(c as u8 - b'a') as usize] += 1.0;
            }
        }
        vector
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        Ok(true)
    }

    async fn chat(&self, request: ChatRequest, _model_id: &str) -> Result<String, ApiError> {
        if self.fail_chat {
            return Err(ApiError::Upstream("stub chat failure".to_string()));
        }
        self.chat_requests.lock().unwrap().push(request);
        Ok(self.reply.clone())
    }

    async fn embed(&self, inputs: &[String], _model_id: &str) -> Result<Vec<Vec<f32>>, ApiError> {
        if let Some(budget) = self.embed_budget.lock().unwrap().as_mut() {
            if *budget == 0 {
                return Err(ApiError::Upstream("stub embed failure".to_string()));
            }
            *budget -= 1;
        }

        Ok(inputs
            .iter()
            .map(|input| Self::letter_frequency_embedding(input))
            .collect())
    }
}
