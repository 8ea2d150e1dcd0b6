//! Semantic retrieval store and document question answering.
//!
//! Text is split into overlapping chunks, embedded, and held in an exact L2
//! index paired with the chunk texts. Queries retrieve the nearest chunks,
//! which the answer pipeline hands to an LLM as context.

pub mod chunker;
pub mod config;
pub mod embeddings;
pub mod ingest;
pub mod parser;
pub mod rag;
pub mod store;
pub mod types;
pub mod vector_index;

pub use chunker::chunk_text;
pub use config::{load_config, save_config, StoreConfig};
pub use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
pub use ingest::{ingest_file, ingest_paths};
pub use parser::{extract_text, is_allowed_upload, ContentType};
pub use rag::{answer, Answer, AnswerOptions};
pub use store::VectorStore;
pub use types::{
    DocumentOptions, IngestStats, RetrievedChunk, StoreStats, CONTEXT_SEPARATOR, DEFAULT_TOP_K,
};
pub use vector_index::{FlatL2Index, VectorIndex};
