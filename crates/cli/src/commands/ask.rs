//! Ask command handler.
//!
//! Answers a question from the indexed documents using the configured LLM.

use super::open_workspace_store;
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_knowledge::{answer, AnswerOptions};
use docqa_llm::create_client_from_config;
use docqa_prompt::{load_prompt, DEFAULT_CONTEXT_PROMPT_ID};

/// Ask a question about the indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: String,

    /// Number of context chunks (default from store config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Prompt definition id under .docqa/prompts/
    #[arg(long, default_value = DEFAULT_CONTEXT_PROMPT_ID)]
    pub prompt: String,

    /// Temperature for response generation (0.0-2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum tokens in response
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        config.validate()?;

        let (store_config, store) = open_workspace_store(config).await?;
        let llm = create_client_from_config(config)?;
        let prompt = load_prompt(&config.workspace, &self.prompt)?;

        let mut options = AnswerOptions::new(self.query.clone(), config.model.clone())
            .with_top_k(self.top_k.unwrap_or(store_config.top_k));
        if let Some(temperature) = self.temperature {
            options.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            options.max_tokens = max_tokens;
        }

        let result = answer(&store, llm.as_ref(), &prompt, &options).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", result.text_response);
            println!();
            println!("{}", result.summary);
        }

        Ok(())
    }
}
