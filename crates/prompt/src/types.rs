//! Prompt types for DocQA.

use serde::{Deserialize, Serialize};

/// Identifier of the built-in context answering prompt.
pub const DEFAULT_CONTEXT_PROMPT_ID: &str = "docqa.answer.context";

const DEFAULT_SYSTEM: &str = "You are a helpful AI assistant that provides accurate and relevant \
information based on the given context.";

const DEFAULT_TEMPLATE: &str = r#"Answer the user's question using the provided context. If the context doesn't contain relevant information to answer the question, clearly state that.

Context:
{{context}}

User Question: {{query}}

Guidelines:
1. Base your answer ONLY on the provided context
2. If the context doesn't contain relevant information, say: "I don't have enough information in the provided context to answer this question."
3. Structure your response in THREE distinct sections:

   [TRANSCRIPTION]
   - Provide a clear restatement of the key information from the context
   - Focus on the most relevant parts that answer the question

   [RESPONSE]
   - Give a detailed, well-structured answer to the question
   - Include specific details from the context
   - Use bullet points or numbered lists when appropriate

   [SUMMARY]
   - Provide 3-4 key points that summarize the main takeaways
   - Use bullet points for clarity

4. Format each section with the exact headers shown above: [TRANSCRIPTION], [RESPONSE], and [SUMMARY]
5. Do not make assumptions or add information not present in the context

Answer:
"#;

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Optional system message sent alongside the rendered template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,
}

/// The built-in prompt used to answer a question from retrieved context.
///
/// Expects the `context` and `query` variables.
pub fn default_context_prompt() -> PromptDefinition {
    PromptDefinition {
        id: DEFAULT_CONTEXT_PROMPT_ID.to_string(),
        title: "Answer from document context".to_string(),
        system: Some(DEFAULT_SYSTEM.to_string()),
        template: DEFAULT_TEMPLATE.to_string(),
    }
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,
}
