use std::io;

use fetch_state::FetchError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the fetch-state CLI application.
///
/// This enum represents all possible error conditions that can arise during
/// CLI operations, including configuration issues, failed retrievals and
/// I/O problems.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or parsing configuration.
    ///
    /// This error is returned when there are issues with the configuration file,
    /// such as invalid values or file access problems.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A controller or retriever could not be set up.
    #[error("Failed to set up fetching: {0}")]
    Setup(#[from] fetch_state::Error),

    /// The retrieval attempt completed with an error.
    #[error("Request failed: {0}")]
    Request(FetchError),

    /// A line typed into the watch session was not understood.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Data could not be rendered for output.
    #[error("Failed to render output: {0}")]
    Render(String),
}
