//! Retrieval orchestrator.
//!
//! Owns the vector store and the embedding side of the provider. The index
//! is built once at startup from the CSV dataset and treated as read-only
//! while serving; `build_index` is called again only on explicit reindex.

use std::sync::Arc;

use uuid::Uuid;

use super::context::{ContextBuilder, QueryContext};
use super::store::{StoredRecord, VectorStore};
use crate::core::errors::ApiError;
use crate::dataset::QaRecord;
use crate::llm::provider::LlmProvider;

/// Retrieval tuning, resolved from `AppConfig` at startup.
#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    pub top_k: usize,
    pub max_context_chars: usize,
    pub min_score: f32,
    pub embed_batch_size: usize,
    pub embedding_model: String,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_context_chars: 4000,
            min_score: 0.0,
            embed_batch_size: 32,
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

pub struct RagEngine {
    store: Arc<dyn VectorStore>,
    provider: Arc<dyn LlmProvider>,
    options: RetrievalOptions,
    context_builder: ContextBuilder,
}

impl RagEngine {
    pub fn new(
        store: Arc<dyn VectorStore>,
        provider: Arc<dyn LlmProvider>,
        options: RetrievalOptions,
    ) -> Self {
        let context_builder = ContextBuilder::new(
            options.top_k,
            options.max_context_chars,
            options.min_score,
        );
        Self {
            store,
            provider,
            options,
            context_builder,
        }
    }

    /// Embed the dataset questions and replace the index contents.
    ///
    /// All embeddings are collected in memory before the store is touched,
    /// so a provider failure part-way through leaves the previous index
    /// intact rather than a partially rebuilt one.
    ///
    /// Returns the number of indexed records; errors if the resulting index
    /// size does not match the dataset size.
    pub async fn build_index(&self, records: &[QaRecord]) -> Result<usize, ApiError> {
        let batch_size = self.options.embed_batch_size.max(1);

        let mut items: Vec<(StoredRecord, Vec<f32>)> = Vec::with_capacity(records.len());
        for batch in records.chunks(batch_size) {
            let inputs: Vec<String> = batch.iter().map(|r| r.question.clone()).collect();
            let embeddings = self
                .provider
                .embed(&inputs, &self.options.embedding_model)
                .await?;

            items.extend(batch.iter().zip(embeddings).map(|(record, embedding)| {
                (
                    StoredRecord {
                        record_id: Uuid::new_v4().to_string(),
                        question: record.question.clone(),
                        answer: record.answer.clone(),
                    },
                    embedding,
                )
            }));
        }

        self.store.clear().await?;
        self.store.insert_batch(items).await?;

        let indexed = self.store.count().await?;
        if indexed != records.len() {
            return Err(ApiError::Internal(format!(
                "index size {} does not match dataset size {}",
                indexed,
                records.len()
            )));
        }

        tracing::info!("Indexed {} dataset records", indexed);
        Ok(indexed)
    }

    /// Embed the question, search top-k, and assemble the context block.
    pub async fn retrieve(&self, question: &str) -> Result<QueryContext, ApiError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ApiError::BadRequest("question must not be empty".to_string()));
        }

        let embeddings = self
            .provider
            .embed(&[question.to_string()], &self.options.embedding_model)
            .await?;
        let query_embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Upstream("embedding response was empty".to_string()))?;

        let results = self
            .store
            .search(&query_embedding, self.options.top_k)
            .await?;

        Ok(self.context_builder.build(&results))
    }

    pub async fn index_size(&self) -> Result<usize, ApiError> {
        self.store.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubProvider;
    use crate::rag::sqlite::SqliteVectorStore;

    async fn test_engine(top_k: usize) -> RagEngine {
        let tmp = std::env::temp_dir().join(format!("eduqa-engine-test-{}.db", Uuid::new_v4()));
        let store = SqliteVectorStore::with_path(tmp).await.unwrap();
        let options = RetrievalOptions {
            top_k,
            ..Default::default()
        };
        RagEngine::new(
            Arc::new(store),
            Arc::new(StubProvider::new("ok")),
            options,
        )
    }

    fn sample_records() -> Vec<QaRecord> {
        vec![
            QaRecord {
                question: "What is photosynthesis?".to_string(),
                answer: "The process by which plants convert light into energy.".to_string(),
            },
            QaRecord {
                question: "What is an atom?".to_string(),
                answer: "The smallest unit of ordinary matter.".to_string(),
            },
            QaRecord {
                question: "Who wrote Hamlet?".to_string(),
                answer: "William Shakespeare.".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn build_index_matches_dataset_size() {
        let engine = test_engine(4).await;
        let records = sample_records();

        let indexed = engine.build_index(&records).await.unwrap();
        assert_eq!(indexed, records.len());
        assert_eq!(engine.index_size().await.unwrap(), records.len());
    }

    #[tokio::test]
    async fn failed_rebuild_keeps_previous_index_intact() {
        let tmp = std::env::temp_dir().join(format!("eduqa-engine-test-{}.db", Uuid::new_v4()));
        let store = SqliteVectorStore::with_path(tmp).await.unwrap();
        let provider = Arc::new(StubProvider::new("ok"));
        let options = RetrievalOptions {
            embed_batch_size: 2,
            ..Default::default()
        };
        let engine = RagEngine::new(Arc::new(store), provider.clone(), options);

        let mut records = sample_records();
        records.push(QaRecord {
            question: "What is osmosis?".to_string(),
            answer: "Movement of water across a semipermeable membrane.".to_string(),
        });
        engine.build_index(&records).await.unwrap();
        assert_eq!(engine.index_size().await.unwrap(), 4);

        // Next rebuild: first batch embeds, second batch fails.
        provider.set_embed_budget(1);
        let err = engine.build_index(&records).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));

        // The previous index is still served, not a partial one.
        assert_eq!(engine.index_size().await.unwrap(), 4);
        provider.set_embed_budget(usize::MAX);
        let context = engine.retrieve("What is photosynthesis?").await.unwrap();
        assert!(context.text.contains("plants convert light"));
    }

    #[tokio::test]
    async fn rebuilding_yields_identical_size() {
        let engine = test_engine(4).await;
        let records = sample_records();

        let first = engine.build_index(&records).await.unwrap();
        let second = engine.build_index(&records).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn exact_match_question_is_top_result() {
        let engine = test_engine(1).await;
        engine.build_index(&sample_records()).await.unwrap();

        let context = engine.retrieve("What is photosynthesis?").await.unwrap();
        assert_eq!(context.sources, vec!["What is photosynthesis?"]);
        assert!(context.text.contains("plants convert light"));
    }

    #[tokio::test]
    async fn context_holds_at_most_top_k_records() {
        let engine = test_engine(2).await;
        engine.build_index(&sample_records()).await.unwrap();

        let context = engine.retrieve("what is matter made of").await.unwrap();
        assert!(context.sources.len() <= 2);
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let engine = test_engine(4).await;
        engine.build_index(&sample_records()).await.unwrap();

        let err = engine.retrieve("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
