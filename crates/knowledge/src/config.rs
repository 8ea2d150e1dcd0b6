//! Vector store configuration management.
//!
//! Settings live in `.docqa/store.yaml`. A missing file yields defaults.

use crate::chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::embeddings::{create_provider, EmbeddingConfig};
use crate::store::VectorStore;
use crate::types::{DocumentOptions, DEFAULT_TOP_K};
use docqa_core::config::STATE_DIR;
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Store directory, relative to the workspace unless absolute
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Embedding settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_store_dir() -> PathBuf {
    Path::new(STATE_DIR).join("vector_store")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            store_dir: default_store_dir(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Chunking options from this config.
    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            chunk_size: self.chunk_size,
            overlap: self.chunk_overlap,
        }
    }

    /// Open the store saved under `workspace`, or an empty one if none exists.
    pub async fn open_store(&self, workspace: &Path) -> AppResult<VectorStore> {
        let embedder = create_provider(&self.embedding)?;
        VectorStore::open_or_create(&self.store_path(workspace), embedder).await
    }

    /// Absolute store directory for `workspace`.
    pub fn store_path(&self, workspace: &Path) -> PathBuf {
        if self.store_dir.is_absolute() {
            self.store_dir.clone()
        } else {
            workspace.join(&self.store_dir)
        }
    }
}

/// Load the store configuration from `.docqa/store.yaml`.
pub fn load_config(workspace: &Path) -> AppResult<StoreConfig> {
    let config_path = get_config_path(workspace);

    if !config_path.exists() {
        tracing::debug!("No store config at {:?}, using defaults", config_path);
        return Ok(StoreConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        AppError::Config(format!("Failed to read config at {:?}: {}", config_path, e))
    })?;

    let config: StoreConfig = serde_yaml::from_str(&content).map_err(|e| {
        AppError::Config(format!("Failed to parse config at {:?}: {}", config_path, e))
    })?;

    tracing::debug!("Loaded store config from {:?}", config_path);
    Ok(config)
}

/// Save the store configuration to `.docqa/store.yaml`.
pub fn save_config(workspace: &Path, config: &StoreConfig) -> AppResult<()> {
    let config_path = get_config_path(workspace);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let yaml = serde_yaml::to_string(config)?;

    fs::write(&config_path, yaml).map_err(|e| {
        AppError::Config(format!("Failed to write config to {:?}: {}", config_path, e))
    })?;

    tracing::debug!("Saved store config to {:?}", config_path);
    Ok(())
}

/// Get the path to the store config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(STATE_DIR).join("store.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_default_config() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path()).unwrap();

        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.top_k, 3);
        assert_eq!(
            config.store_path(temp.path()),
            temp.path().join(".docqa").join("vector_store")
        );
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig {
            chunk_size: 1024,
            top_k: 5,
            ..Default::default()
        };

        save_config(temp.path(), &config).unwrap();

        let loaded = load_config(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = get_config_path(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "chunkSize: 200\nembedding:\n  provider: ollama\n  model: nomic-embed-text\n  dimensions: 768\n").unwrap();

        let loaded = load_config(temp.path()).unwrap();
        assert_eq!(loaded.chunk_size, 200);
        assert_eq!(loaded.chunk_overlap, 50);
        assert_eq!(loaded.embedding.dimensions, 768);
    }

    #[tokio::test]
    async fn test_open_store_in_fresh_workspace() {
        let temp = TempDir::new().unwrap();
        let store = StoreConfig::default().open_store(temp.path()).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.chunks_count, 0);
        assert_eq!(stats.dimension, 384);
        assert_eq!(stats.provider, "trigram");
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = get_config_path(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "chunkSize: [not a number").unwrap();

        assert!(matches!(load_config(temp.path()), Err(AppError::Config(_))));
    }
}
