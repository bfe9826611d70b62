//! Command implementations for the fetch-state CLI.

use std::sync::Arc;

use clap::Args;
use fetch_state::{HttpRetriever, Retriever};
use tracing::debug;

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

pub mod config_cmd;
pub mod get_cmd;
pub mod watch_cmd;

/// Connection flags shared by the commands that talk to a server.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL that relative resources are resolved against
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ConnectionArgs {
    /// Loads the configuration file, if any, and applies the flags on top.
    pub fn resolve_config(&self) -> Result<AppConfig, Error> {
        let path = get_config_path(self.config.as_deref());
        // An explicitly named file must exist
        let mut config = if self.config.is_some() {
            AppConfig::load(&path)?
        } else {
            AppConfig::load_or_default(&path)?
        };

        if let Some(base_url) = &self.base_url {
            config.http.base_url = Some(base_url.clone());
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_seconds = Some(timeout);
        }

        debug!(config = ?config, "Resolved configuration");
        Ok(config)
    }
}

/// Builds the HTTP retriever described by the configuration.
pub fn build_retriever(config: &AppConfig) -> Result<Arc<dyn Retriever>, Error> {
    let retriever = HttpRetriever::new(config.retriever_config())?;
    Ok(Arc::new(retriever))
}
