//! Retrieval over the embedded QA dataset.
//!
//! - `VectorStore`: abstract nearest-neighbor storage for record embeddings
//! - `SqliteVectorStore`: in-process implementation (brute-force cosine)
//! - `ContextBuilder`: formats ranked results into a prompt context block
//! - `RagEngine`: embeds the dataset at startup and serves top-k retrieval

pub mod context;
pub mod engine;
pub mod sqlite;
pub mod store;

pub use context::{ContextBuilder, QueryContext};
pub use engine::RagEngine;
pub use sqlite::SqliteVectorStore;
pub use store::{RecordSearchResult, StoredRecord, VectorStore};
