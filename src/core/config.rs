//! Path discovery and typed application configuration.
//!
//! Configuration is read from `config.toml` at the project root; a missing
//! file means defaults for everything. The OpenAI API key is never part of
//! the config file and comes only from the `OPENAI_API_KEY` environment
//! variable.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub history_db_path: PathBuf,
    pub vector_db_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let project_root = discover_project_root();
        let data_dir = discover_data_dir(&project_root);
        let log_dir = data_dir.join("logs");
        let history_db_path = data_dir.join("history.db");
        let vector_db_path = data_dir.join("vectors.db");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            project_root,
            data_dir,
            log_dir,
            history_db_path,
            vector_db_path,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_project_root() -> PathBuf {
    if let Ok(root) = env::var("EDUQA_ROOT") {
        return PathBuf::from(root);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.join("config.toml").exists() {
        return manifest_dir;
    }

    env::current_dir().unwrap_or(manifest_dir)
}

fn discover_data_dir(project_root: &Path) -> PathBuf {
    if let Ok(dir) = env::var("EDUQA_DATA_DIR") {
        return PathBuf::from(dir);
    }

    project_root.join("data")
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    pub retrieval: RetrievalConfig,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub request_timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub max_context_chars: usize,
    pub min_score: f32,
    pub embed_batch_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_context_chars: 4000,
            min_score: 0.0,
            embed_batch_size: 32,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/qa_dataset.csv"),
        }
    }
}

impl AppConfig {
    pub fn load(paths: &AppPaths) -> anyhow::Result<Self> {
        let config_path = paths.project_root.join("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        Ok(config)
    }

    /// Dataset path resolved against the project root.
    pub fn dataset_path(&self, paths: &AppPaths) -> PathBuf {
        if self.dataset.path.is_absolute() {
            self.dataset.path.clone()
        } else {
            paths.project_root.join(&self.dataset.path)
        }
    }
}

/// Read the API key from the environment. Required at startup.
pub fn api_key_from_env() -> anyhow::Result<String> {
    env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not found in environment variables")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_expected_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.openai.chat_model, "gpt-4o-mini");
        assert_eq!(config.openai.max_tokens, 500);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.dataset.path, PathBuf::from("data/qa_dataset.csv"));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let raw = r#"
            [retrieval]
            top_k = 2

            [openai]
            chat_model = "gpt-4o"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.retrieval.max_context_chars, 4000);
        assert_eq!(config.openai.chat_model, "gpt-4o");
        assert_eq!(config.openai.embedding_model, "text-embedding-3-small");
    }

    #[test]
    fn dataset_path_resolves_relative_to_root() {
        let paths = AppPaths {
            project_root: PathBuf::from("/srv/eduqa"),
            data_dir: PathBuf::from("/srv/eduqa/data"),
            log_dir: PathBuf::from("/srv/eduqa/data/logs"),
            history_db_path: PathBuf::from("/srv/eduqa/data/history.db"),
            vector_db_path: PathBuf::from("/srv/eduqa/data/vectors.db"),
        };
        let config = AppConfig::default();
        assert_eq!(
            config.dataset_path(&paths),
            PathBuf::from("/srv/eduqa/data/qa_dataset.csv")
        );
    }
}
