//! Error types for fetch state operations.
//!
//! Two families of errors live here. [`FetchError`] describes why a single
//! retrieval attempt failed; it is stored in the observable state and never
//! returned across the controller boundary. [`Error`] covers failures while
//! setting things up, such as building a controller or an HTTP retriever.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Why a retrieval attempt failed.
///
/// Every failure is terminal for the attempt that produced it. The caller may
/// retry by calling `refetch` again.
///
/// ## Examples
///
/// ```rust
/// use fetch_state::FetchError;
///
/// let error = FetchError::Status { status: 500 };
/// assert!(error.to_string().contains("500"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The retrieval primitive itself failed, e.g. the connection was refused.
    ///
    /// The message is surfaced verbatim.
    #[error("{0}")]
    Transport(String),

    /// The retrieval succeeded at the transport level but the response carried
    /// a non-success status.
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    /// A success response whose body could not be decoded.
    #[error("Failed to parse response body: {0}")]
    Parse(String),
}

impl FetchError {
    /// Creates a transport error from anything printable.
    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::Transport(message.into())
    }

    /// Returns the status code carried by a [`FetchError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Errors that can occur while constructing fetch state components.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A controller was created outside of a tokio runtime.
    ///
    /// Attempts run on spawned tasks, so the controller captures the runtime
    /// handle when it is built.
    #[error("No tokio runtime is available to run retrieval attempts")]
    NoRuntime,

    /// The configured base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A resource identifier could not be turned into a URL.
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}
