//! Add command handler.
//!
//! Extracts text from files and directories and indexes it.

use super::open_workspace_store;
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_knowledge::ingest_paths;
use std::path::PathBuf;

/// Index documents into the workspace store
#[derive(Args, Debug)]
pub struct AddCommand {
    /// Files or directories to index (directories are walked recursively)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Chunk size in characters (default from store config)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between chunks in characters (default from store config)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AddCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing add command for {} paths", self.paths.len());

        let (store_config, store) = open_workspace_store(config).await?;

        let mut options = store_config.document_options();
        if let Some(chunk_size) = self.chunk_size {
            options.chunk_size = chunk_size;
        }
        if let Some(overlap) = self.overlap {
            options.overlap = overlap;
        }

        let stats = ingest_paths(&store, &self.paths, options).await?;

        let store_path = store_config.store_path(&config.workspace);
        store.save(&store_path).await?;

        if self.json {
            let output = serde_json::json!({
                "filesIndexed": stats.files_indexed,
                "filesSkipped": stats.files_skipped,
                "chunksAdded": stats.chunks_added,
                "totalChunks": store.len().await,
                "skipped": stats.skipped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Indexed {} files ({} chunks added, {} total)",
                stats.files_indexed,
                stats.chunks_added,
                store.len().await
            );
            for path in &stats.skipped {
                println!("  skipped: {}", path.display());
            }
        }

        Ok(())
    }
}
