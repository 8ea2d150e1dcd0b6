//! Shared application state for the HTTP service.

use crate::config::ServerConfig;
use docqa_core::{AppConfig, AppResult};
use docqa_knowledge::{load_config, DocumentOptions, StoreConfig, VectorStore};
use docqa_llm::{create_client_from_config, LlmClient};
use docqa_prompt::{load_prompt, PromptDefinition, DEFAULT_CONTEXT_PROMPT_ID};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Cheaply cloneable handle passed to every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Vector store shared by upload and query handlers
    store: VectorStore,
    /// Directory the store is saved to after each upload
    store_path: PathBuf,
    /// Chunking options for uploaded documents
    document_options: DocumentOptions,
    /// Chunks retrieved when a query gives no `top_k`
    top_k: usize,
    llm: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
    /// Absolute upload directory
    upload_dir: PathBuf,
    server: ServerConfig,
}

impl AppState {
    /// Assemble state from already-constructed parts.
    pub fn new(
        workspace: &Path,
        store_config: &StoreConfig,
        store: VectorStore,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        prompt: PromptDefinition,
        server: ServerConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                store_path: store_config.store_path(workspace),
                document_options: store_config.document_options(),
                top_k: store_config.top_k,
                llm,
                model: model.into(),
                prompt,
                upload_dir: server.upload_path(workspace),
                server,
            }),
        }
    }

    /// Open the workspace store and LLM client described by `config`.
    pub async fn from_config(config: &AppConfig, server: ServerConfig) -> AppResult<Self> {
        let workspace = config.workspace.as_path();
        let store_config = load_config(workspace)?;
        let store = store_config.open_store(workspace).await?;
        let llm = create_client_from_config(config)?;
        let prompt = load_prompt(workspace, DEFAULT_CONTEXT_PROMPT_ID)?;

        tracing::info!(
            "Loaded vector store with {} chunks, answering with {} ({})",
            store.len().await,
            llm.provider_name(),
            config.model
        );

        Ok(Self::new(
            workspace,
            &store_config,
            store,
            llm,
            config.model.clone(),
            prompt,
            server,
        ))
    }

    pub fn store(&self) -> &VectorStore {
        &self.inner.store
    }

    pub fn store_path(&self) -> &Path {
        &self.inner.store_path
    }

    pub fn document_options(&self) -> DocumentOptions {
        self.inner.document_options
    }

    pub fn top_k(&self) -> usize {
        self.inner.top_k
    }

    pub fn llm(&self) -> &dyn LlmClient {
        self.inner.llm.as_ref()
    }

    pub fn model(&self) -> &str {
        &self.inner.model
    }

    pub fn prompt(&self) -> &PromptDefinition {
        &self.inner.prompt
    }

    pub fn upload_dir(&self) -> &Path {
        &self.inner.upload_dir
    }

    pub fn server(&self) -> &ServerConfig {
        &self.inner.server
    }
}
