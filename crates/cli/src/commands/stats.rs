//! Stats command handler.

use super::open_workspace_store;
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};

/// Show vector store statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let (store_config, store) = open_workspace_store(config).await?;
        let stats = store.stats().await;
        let store_path = store_config.store_path(&config.workspace);

        if self.json {
            let output = serde_json::json!({
                "chunksCount": stats.chunks_count,
                "dimension": stats.dimension,
                "provider": stats.provider,
                "model": stats.model,
                "storePath": store_path,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Vector store: {}", store_path.display());
            println!("  Chunks: {}", stats.chunks_count);
            println!("  Dimension: {}", stats.dimension);
            println!("  Embeddings: {} ({})", stats.provider, stats.model);
        }

        Ok(())
    }
}
