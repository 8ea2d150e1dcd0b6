//! Command handlers for the DocQA CLI.

pub mod add;
pub mod ask;
pub mod search;
pub mod serve;
pub mod stats;

pub use add::AddCommand;
pub use ask::AskCommand;
pub use search::SearchCommand;
pub use serve::ServeCommand;
pub use stats::StatsCommand;

use docqa_core::{config::AppConfig, AppResult};
use docqa_knowledge::{load_config, StoreConfig, VectorStore};

/// Load the workspace store configuration and open its store.
pub(crate) async fn open_workspace_store(
    config: &AppConfig,
) -> AppResult<(StoreConfig, VectorStore)> {
    let store_config = load_config(&config.workspace)?;
    let store = store_config.open_store(&config.workspace).await?;
    tracing::debug!(
        "Opened store at {:?} ({} chunks)",
        store_config.store_path(&config.workspace),
        store.len().await
    );
    Ok((store_config, store))
}
