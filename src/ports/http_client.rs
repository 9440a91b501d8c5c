//! HTTP port for fetching remote resources.
//!
//! The library needs exactly two remote documents: the provider's public key
//! and the payment method catalog. Both are plain GETs returning text.

use async_trait::async_trait;
use thiserror::Error;

/// Port for simple HTTP GET requests.
///
/// Implementations own timeouts and redirect handling.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetches `url` and returns the response body.
    ///
    /// Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<String, HttpError>;
}

/// Errors returned by an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// Request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Connection, TLS or body read failure.
    #[error("Network error: {0}")]
    Network(String),
}

impl HttpError {
    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        HttpError::Network(message.into())
    }

    /// Returns true if a later attempt could succeed.
    ///
    /// Nothing in this crate retries; this is for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::Timeout | HttpError::Network(_) => true,
            HttpError::Status { status, .. } => *status >= 500 || *status == 429,
        }
    }
}
