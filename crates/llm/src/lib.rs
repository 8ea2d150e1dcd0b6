//! LLM integration crate for DocQA.
//!
//! Provider-agnostic chat completion used by the answer pipeline. Providers
//! sit behind the [`LlmClient`] trait.
//!
//! # Providers
//! - **Groq**: hosted OpenAI-compatible API (default)
//! - **OpenAI**: hosted chat completions
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use docqa_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("llama3.2").with_user("Hello, world!");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage, Role};
pub use factory::{create_client, create_client_from_config};
pub use providers::{OllamaClient, OpenAiCompatibleClient};
