//! The retrieval primitive used by fetch controllers.
//!
//! A controller never talks to the network directly. It hands the current
//! resource identifier to a [`Retriever`] and only distinguishes three
//! outcomes: a transport failure, a response with a non-success status, and a
//! successful response whose body is then decoded.
//!
//! [`HttpRetriever`] is the production implementation, backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::{Error, FetchError};

#[cfg(test)]
#[path = "retriever_tests.rs"]
mod tests;

/// A response produced by a [`Retriever`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Whether the status indicates success.
    pub successful: bool,

    /// The numeric status code.
    pub status: u16,

    /// The raw response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a response, treating any 2xx status as successful.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            successful: (200..=299).contains(&status),
            status,
            body: body.into(),
        }
    }

    /// Creates a response whose body is the serialized JSON value.
    pub fn from_json_value(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string().into_bytes())
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Parse`] when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(FetchError::from)
    }
}

/// Trait for the network retrieval primitive supplied by the host.
///
/// Implementations return `Err(FetchError::Transport(..))` when the retrieval
/// itself fails. Any response, whatever its status, is returned as `Ok`.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieves the given resource.
    async fn retrieve(&self, resource: &str) -> Result<Response, FetchError>;
}

/// Settings for an [`HttpRetriever`].
///
/// Use `Default::default()` and modify fields as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRetrieverConfig {
    /// Base URL that relative resource identifiers are joined onto.
    pub base_url: Option<String>,

    /// Per request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Value of the `User-Agent` header.
    pub user_agent: Option<String>,
}

/// A [`Retriever`] that issues HTTP GET requests.
///
/// Absolute resource identifiers are requested as-is. Relative ones, such as
/// `/api/data`, are resolved against the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpRetriever {
    /// Builds a retriever from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an `Error::InvalidBaseUrl` if the base URL does not parse, or an
    /// `Error::ClientBuild` if the HTTP client cannot be constructed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fetch_state::{HttpRetriever, HttpRetrieverConfig};
    ///
    /// let retriever = HttpRetriever::new(HttpRetrieverConfig {
    ///     base_url: Some("https://example.com".to_string()),
    ///     ..Default::default()
    /// })
    /// .unwrap();
    /// assert_eq!(
    ///     retriever.resolve("/api/data").unwrap().as_str(),
    ///     "https://example.com/api/data"
    /// );
    /// ```
    pub fn new(config: HttpRetrieverConfig) -> Result<Self, Error> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|base| Url::parse(base).map_err(|e| Error::InvalidBaseUrl(format!("{base}: {e}"))))
            .transpose()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Resolves a resource identifier into the URL that will be requested.
    ///
    /// # Errors
    ///
    /// Returns an `Error::InvalidResource` when the identifier is relative and
    /// no base URL is configured, or when joining fails.
    pub fn resolve(&self, resource: &str) -> Result<Url, Error> {
        if let Ok(url) = Url::parse(resource) {
            return Ok(url);
        }

        match &self.base_url {
            Some(base) => base
                .join(resource)
                .map_err(|e| Error::InvalidResource(format!("{resource}: {e}"))),
            None => Err(Error::InvalidResource(format!(
                "{resource}: relative resource without a base URL"
            ))),
        }
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    #[instrument(skip(self))]
    async fn retrieve(&self, resource: &str) -> Result<Response, FetchError> {
        let url = self
            .resolve(resource)
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        debug!(url = %url, "Sending request");
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(resource = resource, error = %e, "Request failed at the transport level");
            FetchError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        debug!(status = status, body_len = body.len(), "Received response");
        Ok(Response::new(status, body.to_vec()))
    }
}
