//! Configuration management for the fetch-state CLI.
//!
//! The configuration is stored in TOML format and can be loaded from a
//! specified file path or from the default location in the current directory.
//! Command line flags take precedence over values read from the file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use fetch_state::{FetchOptions, HttpRetrieverConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "fetch-state.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the fetch-state CLI application.
///
/// # Example TOML Configuration
///
/// ```toml
/// [http]
/// base_url = "http://localhost:8080"
/// timeout_seconds = 10
///
/// [fetch]
/// manual = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// How resources are retrieved over HTTP.
    #[serde(default)]
    pub http: HttpConfig,

    /// When attempts start.
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read, or
    /// does not contain a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads configuration from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the specified path.
    ///
    /// Parent directories are created when missing and existing files are
    /// overwritten.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Builds the settings for the HTTP retriever.
    pub fn retriever_config(&self) -> HttpRetrieverConfig {
        HttpRetrieverConfig {
            base_url: self.http.base_url.clone(),
            timeout: self.http.timeout_seconds.map(Duration::from_secs),
            user_agent: Some(self.http.user_agent.clone()),
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            manual: self.fetch.manual,
        }
    }
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL that relative resources are resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout. Requests wait indefinitely when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    #[serde(default = "HttpConfig::default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    fn default_user_agent() -> String {
        format!("fetch-state/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: None,
            user_agent: HttpConfig::default_user_agent(),
        }
    }
}

/// Triggering settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Only fetch when explicitly asked to.
    #[serde(default)]
    pub manual: bool,
}

/// Resolves the path to the configuration file.
///
/// If `config_path` is `Some(path)` that path is used, otherwise
/// `./fetch-state.toml` in the current directory.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
