//! Vector store type definitions.

use crate::chunker::{validate_chunking, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use docqa_core::AppResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of chunks retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Separator used when joining retrieved chunks into a context string.
pub const CONTEXT_SEPARATOR: &str = " ";

/// Chunking options for [`add_document`](crate::store::VectorStore::add_document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    /// Chunk length in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub overlap: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl DocumentOptions {
    /// `InvalidInput` when `chunk_size == 0` or `overlap >= chunk_size`.
    pub fn validate(&self) -> AppResult<()> {
        validate_chunking(self.chunk_size, self.overlap)
    }
}

/// A chunk returned from a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Position of the chunk in the store
    pub ordinal: usize,

    /// Squared L2 distance to the query (lower is closer)
    pub distance: f32,

    /// Chunk text
    pub text: String,
}

/// Statistics about a vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of stored chunks
    pub chunks_count: usize,

    /// Embedding dimension
    pub dimension: usize,

    /// Embedding provider name
    pub provider: String,

    /// Embedding model name
    pub model: String,
}

/// Summary of an ingestion run over one or more files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Files that produced at least one chunk
    pub files_indexed: u32,

    /// Files skipped (unsupported type or no extractable text)
    pub files_skipped: u32,

    /// Chunks added to the store
    pub chunks_added: usize,

    /// Paths that were skipped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<PathBuf>,
}
