//! Search command handler.

use super::open_workspace_store;
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_knowledge::rag::types::NO_DOCUMENTS_RESPONSE;
use docqa_knowledge::CONTEXT_SEPARATOR;

/// Retrieve the chunks nearest to a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Number of chunks to retrieve (default from store config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output ranked chunks as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let (store_config, store) = open_workspace_store(config).await?;
        let k = self.top_k.unwrap_or(store_config.top_k);

        let chunks = match store.search_chunks(&self.query, k).await {
            Ok(chunks) => chunks,
            Err(e) if e.is_empty_store() => {
                if self.json {
                    println!("[]");
                } else {
                    println!("{}", NO_DOCUMENTS_RESPONSE);
                }
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        } else {
            let context = chunks
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR);
            println!("{}", context);
        }

        Ok(())
    }
}
