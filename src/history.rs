//! Per-day Q&A exchange history.
//!
//! Display-only: exchanges are appended after a successful answer and read
//! back for the UI sidebar. History never feeds into retrieval or generation.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use crate::core::errors::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub id: String,
    pub day: String,
    pub question: String,
    pub answer: String,
    pub created_at: String,
}

#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, ApiError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(ApiError::internal)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), ApiError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS exchanges (
                id TEXT PRIMARY KEY,
                day TEXT NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exchanges_day ON exchanges(day)")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(())
    }

    fn today() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    pub async fn append(&self, question: &str, answer: &str) -> Result<(), ApiError> {
        sqlx::query("INSERT INTO exchanges (id, day, question, answer) VALUES (?1, ?2, ?3, ?4)")
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(Self::today())
            .bind(question)
            .bind(answer)
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(())
    }

    /// Today's most recent exchanges, oldest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Exchange>, ApiError> {
        let rows = sqlx::query(
            "SELECT id, day, question, answer, created_at
             FROM exchanges
             WHERE day = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )
        .bind(Self::today())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        let mut exchanges: Vec<Exchange> = rows
            .iter()
            .map(|row| Exchange {
                id: row.get("id"),
                day: row.get("day"),
                question: row.get("question"),
                answer: row.get("answer"),
                created_at: row.get("created_at"),
            })
            .collect();
        exchanges.reverse();

        Ok(exchanges)
    }

    pub async fn clear_today(&self) -> Result<usize, ApiError> {
        let result = sqlx::query("DELETE FROM exchanges WHERE day = ?1")
            .bind(Self::today())
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(result.rows_affected() as usize)
    }

    pub async fn clear_all(&self) -> Result<usize, ApiError> {
        let result = sqlx::query("DELETE FROM exchanges")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(result.rows_affected() as usize)
    }

    pub async fn count(&self) -> Result<usize, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exchanges")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> HistoryStore {
        let tmp = std::env::temp_dir().join(format!("eduqa-history-test-{}.db", uuid::Uuid::new_v4()));
        HistoryStore::new(tmp).await.unwrap()
    }

    #[tokio::test]
    async fn append_and_recent_round_trip() {
        let store = test_store().await;

        store.append("q1", "a1").await.unwrap();
        store.append("q2", "a2").await.unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].question, "q1");
        assert_eq!(recent[1].question, "q2");
    }

    #[tokio::test]
    async fn recent_honours_limit_keeping_newest() {
        let store = test_store().await;

        for i in 0..5 {
            store
                .append(&format!("q{}", i), &format!("a{}", i))
                .await
                .unwrap();
        }

        let recent = store.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].question, "q4");
    }

    #[tokio::test]
    async fn zero_limit_returns_no_exchanges() {
        let store = test_store().await;

        store.append("q", "a").await.unwrap();

        let recent = store.recent(0).await.unwrap();
        assert!(recent.is_empty());
    }

    #[tokio::test]
    async fn clear_today_removes_todays_exchanges() {
        let store = test_store().await;

        store.append("q", "a").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        let removed = store.clear_today().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
