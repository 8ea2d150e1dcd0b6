//! Answer pipeline types.

use crate::types::{RetrievedChunk, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};

/// Reply used when the store holds no documents.
pub const NO_DOCUMENTS_RESPONSE: &str =
    "I don't have any documents to search through yet. Please upload some documents first.";

/// Summary used when the store holds no documents.
pub const NO_DOCUMENTS_SUMMARY: &str = "No documents available for analysis.";

/// Sampling temperature for answer generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Token cap for answer generation.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Options for [`answer`](crate::rag::answer).
#[derive(Debug, Clone)]
pub struct AnswerOptions {
    /// The user's question
    pub query: String,

    /// Chunks retrieved as context
    pub top_k: usize,

    /// LLM model identifier
    pub model: String,

    pub temperature: f32,

    pub max_tokens: u32,
}

impl AnswerOptions {
    /// Options with default retrieval and sampling settings.
    pub fn new(query: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Answer synthesized from retrieved context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Full LLM response
    pub text_response: String,

    /// "Key points" digest of the response
    pub summary: String,

    /// Chunks the answer was grounded on, nearest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_chunks: Vec<RetrievedChunk>,
}

impl Answer {
    /// The reply given when there is nothing to search.
    pub fn no_documents() -> Self {
        Self {
            text_response: NO_DOCUMENTS_RESPONSE.to_string(),
            summary: NO_DOCUMENTS_SUMMARY.to_string(),
            context_chunks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_documents_answer() {
        let answer = Answer::no_documents();
        assert!(answer.text_response.contains("upload some documents"));
        assert_eq!(answer.summary, NO_DOCUMENTS_SUMMARY);
        assert!(answer.context_chunks.is_empty());
    }

    #[test]
    fn test_answer_options_defaults() {
        let options = AnswerOptions::new("q", "model").with_top_k(5);
        assert_eq!(options.top_k, 5);
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.max_tokens, 1024);
    }
}
