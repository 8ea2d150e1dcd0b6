//! Persistable vector store.
//!
//! Pairs a [`VectorIndex`] with an ordered table of chunk texts. Ordinal `i`
//! in the index always names `texts[i]`; every mutation extends both halves
//! together under one write lock.

use crate::chunker::chunk_text;
use crate::embeddings::EmbeddingProvider;
use crate::types::{DocumentOptions, RetrievedChunk, StoreStats, CONTEXT_SEPARATOR};
use crate::vector_index::{FlatL2Index, VectorIndex};
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Serialized index file inside a store directory.
pub const INDEX_FILE: &str = "index.bin";

/// Serialized text table inside a store directory.
pub const TEXTS_FILE: &str = "texts.json";

const TEXTS_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedTexts {
    schema_version: u32,
    count: usize,
    dimension: usize,
    checksum: String,
    texts: Vec<String>,
}

struct StoreState<I> {
    index: I,
    texts: Vec<String>,
}

/// Semantic retrieval store.
///
/// Shared between tasks as `Arc<VectorStore>`. Searches run concurrently;
/// `add_document` and `reload` are exclusive. Saves are serialized with each
/// other and exclude writers for their whole duration.
pub struct VectorStore<I: VectorIndex = FlatL2Index> {
    embedder: Arc<dyn EmbeddingProvider>,
    state: RwLock<StoreState<I>>,
    save_guard: Mutex<()>,
}

impl VectorStore<FlatL2Index> {
    /// Create an empty store sized to the embedder's dimension.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_index(embedder)
    }
}

impl<I: VectorIndex> VectorStore<I> {
    /// Create an empty store backed by index type `I`.
    pub fn with_index(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let index = I::with_dimension(embedder.dimensions());
        Self {
            embedder,
            state: RwLock::new(StoreState {
                index,
                texts: Vec::new(),
            }),
            save_guard: Mutex::new(()),
        }
    }

    /// Load a store previously written by [`save`](Self::save).
    pub async fn load(path: &Path, embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        let state = read_state::<I>(path, embedder.dimensions()).await?;
        tracing::info!(
            "Loaded vector store from {:?} ({} chunks)",
            path,
            state.texts.len()
        );
        Ok(Self {
            embedder,
            state: RwLock::new(state),
            save_guard: Mutex::new(()),
        })
    }

    /// Load the store at `path` if both artifacts exist, otherwise start empty.
    pub async fn open_or_create(
        path: &Path,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> AppResult<Self> {
        let index_exists = tokio::fs::try_exists(path.join(INDEX_FILE)).await?;
        let texts_exist = tokio::fs::try_exists(path.join(TEXTS_FILE)).await?;

        if index_exists && texts_exist {
            Self::load(path, embedder).await
        } else {
            tracing::debug!("No saved store at {:?}, starting empty", path);
            Ok(Self::with_index(embedder))
        }
    }

    /// Replace the in-memory state with the store saved at `path`.
    ///
    /// On error the current state is kept.
    pub async fn reload(&self, path: &Path) -> AppResult<()> {
        let loaded = read_state::<I>(path, self.embedder.dimensions()).await?;
        let mut state = self.state.write().await;
        *state = loaded;
        tracing::info!("Reloaded vector store from {:?}", path);
        Ok(())
    }

    /// Chunk, embed and append a document with default chunking.
    pub async fn add_document_default(&self, text: &str) -> AppResult<usize> {
        self.add_document(text, DocumentOptions::default()).await
    }

    /// Chunk, embed and append a document. Returns the number of chunks added.
    ///
    /// Embedding happens before any mutation, so a failure leaves the store
    /// unchanged.
    pub async fn add_document(&self, text: &str, options: DocumentOptions) -> AppResult<usize> {
        let chunks = chunk_text(text, options.chunk_size, options.overlap)?;
        if chunks.is_empty() {
            tracing::info!("Document produced no chunks, nothing to add");
            return Ok(0);
        }

        let vectors = self.embedder.embed_batch(&chunks).await?;
        if vectors.len() != chunks.len() {
            return Err(AppError::ModelUnavailable(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let added = chunks.len();
        let mut state = self.state.write().await;
        state.index.add(&vectors)?;
        state.texts.extend(chunks);

        tracing::info!(
            "Added {} chunks to vector store (total: {})",
            added,
            state.texts.len()
        );
        Ok(added)
    }

    /// Retrieve the `k` chunks nearest to `query`, closest first.
    pub async fn search_chunks(&self, query: &str, k: usize) -> AppResult<Vec<RetrievedChunk>> {
        if k == 0 {
            return Err(AppError::InvalidInput("k must be at least 1".to_string()));
        }
        if self.is_empty().await {
            return Err(AppError::EmptyStore);
        }

        let query_vector = self.embedder.embed(query).await?;

        let state = self.state.read().await;
        if state.texts.is_empty() {
            return Err(AppError::EmptyStore);
        }

        let hits = state.index.search(&query_vector, k)?;
        let chunks = hits
            .into_iter()
            .map(|(distance, ordinal)| {
                state
                    .texts
                    .get(ordinal)
                    .map(|text| RetrievedChunk {
                        ordinal,
                        distance,
                        text: text.clone(),
                    })
                    .ok_or_else(|| {
                        AppError::CorruptStore(format!(
                            "index returned ordinal {} but only {} texts are stored",
                            ordinal,
                            state.texts.len()
                        ))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!(
            "Retrieved {} chunks for query (nearest distance: {:?})",
            chunks.len(),
            chunks.first().map(|c| c.distance)
        );
        Ok(chunks)
    }

    /// Retrieve the `k` nearest chunks joined into one context string.
    pub async fn search(&self, query: &str, k: usize) -> AppResult<String> {
        let chunks = self.search_chunks(query, k).await?;
        Ok(chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR))
    }

    /// Write `index.bin` and `texts.json` into `path`.
    ///
    /// Each artifact is written to a temporary sibling and renamed into place.
    /// The two renames are not atomic together: a crash between them leaves a
    /// new `index.bin` beside the previous `texts.json`, which the next
    /// [`load`](Self::load) reports as `CorruptStore`.
    pub async fn save(&self, path: &Path) -> AppResult<()> {
        // Saves share the temporary file names, so only one may run at a time.
        let _saving = self.save_guard.lock().await;
        let state = self.state.read().await;

        tokio::fs::create_dir_all(path).await?;

        let persisted = PersistedTexts {
            schema_version: TEXTS_SCHEMA_VERSION,
            count: state.texts.len(),
            dimension: state.index.dimension(),
            checksum: texts_checksum(&state.texts),
            texts: state.texts.clone(),
        };

        write_atomic(&path.join(INDEX_FILE), &state.index.to_bytes()).await?;
        write_atomic(&path.join(TEXTS_FILE), &serde_json::to_vec_pretty(&persisted)?).await?;

        tracing::info!(
            "Saved vector store to {:?} ({} chunks)",
            path,
            state.texts.len()
        );
        Ok(())
    }

    /// Number of stored chunks.
    pub async fn len(&self) -> usize {
        self.state.read().await.texts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Embedding dimension of stored vectors.
    pub async fn dimension(&self) -> usize {
        self.state.read().await.index.dimension()
    }

    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        StoreStats {
            chunks_count: state.texts.len(),
            dimension: state.index.dimension(),
            provider: self.embedder.provider_name().to_string(),
            model: self.embedder.model_name().to_string(),
        }
    }

    /// The embedding provider used by this store.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }
}

async fn read_state<I: VectorIndex>(
    path: &Path,
    embedder_dimension: usize,
) -> AppResult<StoreState<I>> {
    let index_bytes = tokio::fs::read(path.join(INDEX_FILE)).await?;
    let index = I::from_bytes(&index_bytes)?;

    let texts_bytes = tokio::fs::read(path.join(TEXTS_FILE)).await?;
    let persisted: PersistedTexts = serde_json::from_slice(&texts_bytes)
        .map_err(|e| AppError::CorruptStore(format!("unreadable {}: {}", TEXTS_FILE, e)))?;

    if persisted.schema_version != TEXTS_SCHEMA_VERSION {
        return Err(AppError::CorruptStore(format!(
            "unsupported {} schema version {}",
            TEXTS_FILE, persisted.schema_version
        )));
    }
    if persisted.count != persisted.texts.len() {
        return Err(AppError::CorruptStore(format!(
            "{} records {} texts but contains {}",
            TEXTS_FILE,
            persisted.count,
            persisted.texts.len()
        )));
    }
    if persisted.checksum != texts_checksum(&persisted.texts) {
        return Err(AppError::CorruptStore(format!(
            "{} checksum mismatch",
            TEXTS_FILE
        )));
    }
    if persisted.dimension != index.dimension() {
        return Err(AppError::CorruptStore(format!(
            "{} records dimension {} but index has {}",
            TEXTS_FILE,
            persisted.dimension,
            index.dimension()
        )));
    }
    if index.len() != persisted.texts.len() {
        return Err(AppError::CorruptStore(format!(
            "index holds {} vectors but {} texts are stored",
            index.len(),
            persisted.texts.len()
        )));
    }
    if index.dimension() != embedder_dimension {
        return Err(AppError::DimensionMismatch {
            expected: embedder_dimension,
            actual: index.dimension(),
        });
    }

    Ok(StoreState {
        index,
        texts: persisted.texts,
    })
}

/// SHA-256 over each text prefixed by its byte length, as lowercase hex.
fn texts_checksum(texts: &[String]) -> String {
    let mut hasher = Sha256::new();
    for text in texts {
        hasher.update((text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let mut tmp = PathBuf::from(path);
    let file_name = path
        .file_name()
        .map(|n| format!("{}.tmp", n.to_string_lossy()))
        .ok_or_else(|| AppError::InvalidInput(format!("not a file path: {:?}", path)))?;
    tmp.set_file_name(file_name);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
