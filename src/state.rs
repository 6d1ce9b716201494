use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::core::config::{api_key_from_env, AppConfig, AppPaths};
use crate::history::HistoryStore;
use crate::llm::openai::OpenAiProvider;
use crate::llm::provider::LlmProvider;
use crate::qa::QaService;
use crate::rag::engine::{RagEngine, RetrievalOptions};
use crate::rag::sqlite::SqliteVectorStore;

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub dataset_path: PathBuf,
    pub provider: Arc<dyn LlmProvider>,
    pub engine: Arc<RagEngine>,
    pub qa: QaService,
    pub history: HistoryStore,
    dataset_size: Arc<AtomicUsize>,
    #[allow(dead_code)]
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub async fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let config = AppConfig::load(&paths)?;
        let api_key = api_key_from_env()?;
        let dataset_path = config.dataset_path(&paths);

        let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(
            config.openai.base_url.clone(),
            api_key,
            Duration::from_secs(config.openai.request_timeout_secs),
        ));

        let store = Arc::new(SqliteVectorStore::new(&paths).await?);
        let options = RetrievalOptions {
            top_k: config.retrieval.top_k,
            max_context_chars: config.retrieval.max_context_chars,
            min_score: config.retrieval.min_score,
            embed_batch_size: config.retrieval.embed_batch_size,
            embedding_model: config.openai.embedding_model.clone(),
        };
        let engine = Arc::new(RagEngine::new(store, provider.clone(), options));
        let qa = QaService::new(engine.clone(), provider.clone(), &config.openai);
        let history = HistoryStore::new(paths.history_db_path.clone()).await?;
        let started_at = Utc::now();

        Ok(Arc::new(AppState {
            paths,
            config,
            dataset_path,
            provider,
            engine,
            qa,
            history,
            dataset_size: Arc::new(AtomicUsize::new(0)),
            started_at,
        }))
    }

    pub fn dataset_size(&self) -> usize {
        self.dataset_size.load(Ordering::Relaxed)
    }

    pub fn set_dataset_size(&self, size: usize) {
        self.dataset_size.store(size, Ordering::Relaxed);
    }
}
