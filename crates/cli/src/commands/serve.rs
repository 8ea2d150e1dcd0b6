//! Serve command handler.

use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_server::{AppState, ServerConfig};

/// Start the HTTP service
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(long, env = "DOCQA_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "DOCQA_PORT")]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        config.validate()?;

        let mut server = ServerConfig::default();
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }

        let state = AppState::from_config(config, server).await?;
        docqa_server::serve(state).await
    }
}
