//! Answer orchestration.
//!
//! Retrieves context from the store, renders the answer prompt and asks the
//! LLM to respond.

use crate::rag::types::{Answer, AnswerOptions};
use crate::store::VectorStore;
use crate::types::CONTEXT_SEPARATOR;
use crate::vector_index::VectorIndex;
use docqa_core::{AppError, AppResult};
use docqa_llm::{LlmClient, LlmRequest};
use docqa_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;

/// Sentences shorter than this are left out of the summary.
const MIN_SUMMARY_SENTENCE_CHARS: usize = 20;

/// Sentences kept in the summary.
const MAX_SUMMARY_POINTS: usize = 3;

/// Answer a question from the documents in `store`.
///
/// An empty store is not an error here: it produces [`Answer::no_documents`].
pub async fn answer<I: VectorIndex>(
    store: &VectorStore<I>,
    llm: &dyn LlmClient,
    prompt: &PromptDefinition,
    options: &AnswerOptions,
) -> AppResult<Answer> {
    let query = options.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("No query provided".to_string()));
    }

    tracing::info!("Answering query: {}", query);

    let chunks = match store.search_chunks(query, options.top_k).await {
        Ok(chunks) => chunks,
        Err(e) if e.is_empty_store() => {
            tracing::info!("Vector store is empty, returning no-documents answer");
            return Ok(Answer::no_documents());
        }
        Err(e) => return Err(e),
    };

    let context = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    let mut variables = HashMap::new();
    variables.insert("context".to_string(), context);
    variables.insert("query".to_string(), query.to_string());
    let built = build_prompt(prompt, &variables)?;

    let mut request = LlmRequest::new(options.model.clone())
        .with_temperature(options.temperature)
        .with_max_tokens(options.max_tokens);
    if let Some(system) = built.system {
        request = request.with_system(system);
    }
    let request = request.with_user(built.user);

    let response = llm.complete(&request).await?;

    tracing::info!(
        "Generated answer with {} ({} context chunks, {} tokens)",
        llm.provider_name(),
        chunks.len(),
        response.usage.total_tokens
    );

    let summary = summarize(&response.content);
    Ok(Answer {
        text_response: response.content,
        summary,
        context_chunks: chunks,
    })
}

/// Build a "Key points" digest from the first substantial sentences.
pub fn summarize(response: &str) -> String {
    let points: Vec<String> = response
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SUMMARY_SENTENCE_CHARS)
        .take(MAX_SUMMARY_POINTS)
        .map(|s| format!("- {}", s))
        .collect();

    format!("Key points:\n{}", points.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use crate::types::DocumentOptions;
    use docqa_llm::{LlmResponse, LlmUsage};
    use docqa_prompt::default_context_prompt;
    use std::sync::{Arc, Mutex};

    /// Records the last request and replies with a canned answer.
    struct RecordingLlm {
        reply: String,
        last: Mutex<Option<LlmRequest>>,
    }

    impl RecordingLlm {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for RecordingLlm {
        fn provider_name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            *self.last.lock().unwrap() = Some(request.clone());
            Ok(LlmResponse {
                content: self.reply.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(10, 5),
            })
        }
    }

    #[test]
    fn test_summarize_takes_first_three_long_sentences() {
        let response = "Short. The first long sentence is right here. \
            Another sentence that is long enough. Tiny one. \
            A third sentence that also qualifies. A fourth qualifying sentence here.";

        assert_eq!(
            summarize(response),
            "Key points:\n- The first long sentence is right here\n\
             - Another sentence that is long enough\n\
             - A third sentence that also qualifies"
        );
    }

    #[test]
    fn test_summarize_without_long_sentences() {
        assert_eq!(summarize("Yes. No."), "Key points:\n");
    }

    #[tokio::test]
    async fn test_answer_on_empty_store() {
        let store = VectorStore::new(Arc::new(TrigramProvider::new(64)));
        let llm = RecordingLlm::new("unused");

        let answer = answer(
            &store,
            &llm,
            &default_context_prompt(),
            &AnswerOptions::new("anything?", "model"),
        )
        .await
        .unwrap();

        assert_eq!(answer.summary, "No documents available for analysis.");
        assert!(llm.last.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_answer_sends_context_and_query() {
        let store = VectorStore::new(Arc::new(TrigramProvider::new(64)));
        store
            .add_document(
                "Photosynthesis converts sunlight into chemical energy",
                DocumentOptions::default(),
            )
            .await
            .unwrap();
        let llm = RecordingLlm::new("Plants convert sunlight into chemical energy. Done.");

        let answer = answer(
            &store,
            &llm,
            &default_context_prompt(),
            &AnswerOptions::new("What does photosynthesis do?", "deepseek"),
        )
        .await
        .unwrap();

        let request = llm.last.lock().unwrap().clone().unwrap();
        let user = request.last_user_message().unwrap();
        assert!(user.contains("Photosynthesis converts sunlight"));
        assert!(user.contains("What does photosynthesis do?"));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(1024));
        assert_eq!(request.messages[0].role, docqa_llm::Role::System);

        assert_eq!(answer.context_chunks.len(), 1);
        assert_eq!(
            answer.summary,
            "Key points:\n- Plants convert sunlight into chemical energy"
        );
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let store = VectorStore::new(Arc::new(TrigramProvider::new(64)));
        let llm = RecordingLlm::new("unused");

        let result = answer(
            &store,
            &llm,
            &default_context_prompt(),
            &AnswerOptions::new("   ", "model"),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
