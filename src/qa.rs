//! Answer generation over retrieved context.
//!
//! One retrieval pass, one synchronous chat completion. Requests are
//! independent; nothing from a previous exchange feeds back in.

use std::sync::Arc;

use serde::Serialize;

use crate::core::config::OpenAiConfig;
use crate::core::errors::ApiError;
use crate::llm::provider::LlmProvider;
use crate::llm::types::{ChatMessage, ChatRequest};
use crate::rag::engine::RagEngine;

const SYSTEM_PROMPT: &str = "You are EduGPT, a helpful educational assistant. \
Provide clear, accurate, and educational responses.";

#[derive(Debug, Clone, Serialize)]
pub struct AskOutcome {
    pub answer: String,
    /// Dataset questions whose answers were used as context.
    pub sources: Vec<String>,
}

#[derive(Clone)]
pub struct QaService {
    engine: Arc<RagEngine>,
    provider: Arc<dyn LlmProvider>,
    chat_model: String,
    max_tokens: u32,
    temperature: f64,
}

impl QaService {
    pub fn new(
        engine: Arc<RagEngine>,
        provider: Arc<dyn LlmProvider>,
        config: &OpenAiConfig,
    ) -> Self {
        Self {
            engine,
            provider,
            chat_model: config.chat_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Answer a question over retrieved context, optionally extended with
    /// caller-supplied material (the pasted-document equivalent of the UI's
    /// upload box). Supplied material is appended after the retrieved blocks.
    pub async fn ask(&self, question: &str, supplied: Option<&str>) -> Result<AskOutcome, ApiError> {
        let question = question.trim();
        let context = self.engine.retrieve(question).await?;

        let mut context_text = context.text.clone();
        if let Some(extra) = supplied.map(str::trim).filter(|s| !s.is_empty()) {
            if !context_text.is_empty() {
                context_text.push_str("\n\n");
            }
            context_text.push_str(extra);
        }

        let user_prompt = if context_text.is_empty() {
            format!("Question: {}\n\nProvide a helpful educational answer:", question)
        } else {
            format!(
                "Context: {}\n\nQuestion: {}\n\nAnswer this question based on the context provided:",
                context_text, question
            )
        };

        let mut request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ]);
        request.temperature = Some(self.temperature);
        request.max_tokens = Some(self.max_tokens);

        let answer = self.provider.chat(request, &self.chat_model).await?;

        Ok(AskOutcome {
            answer,
            sources: context.sources,
        })
    }
}
