//! reqwest implementation of the HTTP port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};

use crate::ports::{HttpClient, HttpError};

/// Redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client backed by `reqwest` with rustls.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Builds a client with a request timeout and a bounded redirect policy.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("webtopay-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        let response = self.client.get(url).send().await.map_err(map_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(map_error)
    }
}

fn map_error(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else if error.is_connect() {
        HttpError::network(format!("Connection failed: {}", error))
    } else {
        HttpError::network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_custom_timeout() {
        let client = ReqwestHttpClient::new(Duration::from_secs(3)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client = ReqwestHttpClient::new(Duration::from_secs(2)).unwrap();
        let result = client.fetch("http://127.0.0.1:1/public.key").await;
        assert!(matches!(result, Err(HttpError::Network(_)) | Err(HttpError::Timeout)));
    }
}
