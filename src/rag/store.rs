//! VectorStore trait — abstract interface for embedding storage backends.
//!
//! The primary implementation is `SqliteVectorStore` in the `sqlite` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

/// A dataset record as stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Unique record identifier, assigned at index time.
    pub record_id: String,
    /// The dataset question.
    pub question: String,
    /// The dataset answer.
    pub answer: String,
}

/// Result of a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSearchResult {
    pub record: StoredRecord,
    /// Cosine similarity (higher = better).
    pub score: f32,
}

/// Abstract trait for vector index backends.
///
/// The store is written only at startup and on explicit reindex; search is
/// the only operation used while serving requests.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert records with their embedding vectors in one batch.
    async fn insert_batch(&self, items: Vec<(StoredRecord, Vec<f32>)>) -> Result<(), ApiError>;

    /// Return up to `limit` records ranked by cosine similarity, descending.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<RecordSearchResult>, ApiError>;

    /// Total number of indexed records.
    async fn count(&self) -> Result<usize, ApiError>;

    /// Delete all records. Used before rebuilding the index.
    async fn clear(&self) -> Result<(), ApiError>;
}
