//! Embedding providers for the vector store.
//!
//! Maps chunks and queries to fixed-dimension dense vectors behind the
//! [`EmbeddingProvider`] trait.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
