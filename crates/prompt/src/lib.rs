//! Prompt system for DocQA.
//!
//! YAML prompt definitions stored under `.docqa/prompts/`, a built-in
//! context answering prompt, and Handlebars rendering.

pub mod builder;
pub mod loader;
pub mod types;

pub use builder::build_prompt;
pub use loader::{list_prompts, load_prompt};
pub use types::{default_context_prompt, BuiltPrompt, PromptDefinition, DEFAULT_CONTEXT_PROMPT_ID};
