//! Error types for DocQA.
//!
//! This module defines a unified error enum covering configuration, I/O, LLM,
//! prompt and retrieval-store failures. The retrieval kinds (`InvalidInput`,
//! `ModelUnavailable`, `DimensionMismatch`, `EmptyIndex`, `EmptyStore`,
//! `CorruptStore`) are the contract the vector store exposes to its callers.

use thiserror::Error;

/// Unified error type for DocQA.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Knowledge base errors that fit no retrieval-specific kind
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Malformed caller input (e.g. chunking parameters)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The embedding model could not be reached or produced no output
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// A vector does not have the dimension fixed for the index
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// k-NN query against an index holding no vectors
    #[error("Index is empty")]
    EmptyIndex,

    /// Search against a store that has no documents
    #[error("Vector store is empty")]
    EmptyStore,

    /// Persisted artifacts are unreadable or inconsistent with each other
    #[error("Corrupt store: {0}")]
    CorruptStore(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// True for the "no documents yet" conditions that boundaries report as
    /// an informative success rather than a failure.
    pub fn is_empty_store(&self) -> bool {
        matches!(self, AppError::EmptyStore | AppError::EmptyIndex)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = AppError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 384, got 768");
    }

    #[test]
    fn test_knowledge_message() {
        let err = AppError::Knowledge("Extraction task failed: panicked".to_string());
        assert_eq!(
            err.to_string(),
            "Knowledge error: Extraction task failed: panicked"
        );
    }

    #[test]
    fn test_is_empty_store() {
        assert!(AppError::EmptyStore.is_empty_store());
        assert!(AppError::EmptyIndex.is_empty_store());
        assert!(!AppError::CorruptStore("bad".to_string()).is_empty_store());
    }

    #[test]
    fn test_from_serde_json() {
        let err: AppError = serde_json::from_str::<Vec<String>>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
