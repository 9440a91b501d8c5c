//! Lazily fetched provider public key.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::ports::{HttpClient, HttpError};

/// Holds the provider's RSA public key after the first successful fetch.
///
/// Concurrent callers share a single in-flight fetch. A failed fetch leaves
/// the cache empty, so the next caller fetches again.
pub struct PublicKeyCache {
    url: String,
    http: Arc<dyn HttpClient>,
    key: OnceCell<String>,
}

impl PublicKeyCache {
    pub fn new(url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            url: url.into(),
            http,
            key: OnceCell::new(),
        }
    }

    /// Returns the cached key, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns the HTTP error of a failed fetch. Nothing is retried.
    pub async fn get(&self) -> Result<&str, HttpError> {
        let key = self
            .key
            .get_or_try_init(|| async {
                info!(url = %self.url, "Fetching provider public key");
                self.http.fetch(&self.url).await.map_err(|e| {
                    warn!(url = %self.url, error = %e, "Public key fetch failed");
                    e
                })
            })
            .await?;
        Ok(key.as_str())
    }

    pub fn is_cached(&self) -> bool {
        self.key.initialized()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for PublicKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKeyCache")
            .field("url", &self.url)
            .field("cached", &self.is_cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::MockHttpClient;
    use std::time::Duration;

    const URL: &str = "https://keys.test/public.key";

    fn cache(mock: &MockHttpClient) -> PublicKeyCache {
        PublicKeyCache::new(URL, Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn fetches_once_and_caches() {
        let mock = MockHttpClient::new();
        mock.set_response(URL, "PEM");
        let cache = cache(&mock);

        assert_eq!(cache.get().await.unwrap(), "PEM");
        assert_eq!(cache.get().await.unwrap(), "PEM");
        assert!(cache.is_cached());
        assert_eq!(mock.call_count(URL), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_fetch() {
        let mock = MockHttpClient::new();
        mock.set_response(URL, "PEM");
        mock.set_latency(Duration::from_millis(50));
        let cache = cache(&mock);

        let (a, b, c) = tokio::join!(cache.get(), cache.get(), cache.get());

        assert_eq!(a.unwrap(), "PEM");
        assert_eq!(b.unwrap(), "PEM");
        assert_eq!(c.unwrap(), "PEM");
        assert_eq!(mock.call_count(URL), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let mock = MockHttpClient::new();
        mock.set_response(URL, "PEM");
        mock.set_error(HttpError::Timeout);
        let cache = cache(&mock);

        assert_eq!(cache.get().await, Err(HttpError::Timeout));
        assert!(!cache.is_cached());

        assert_eq!(cache.get().await.unwrap(), "PEM");
        assert_eq!(mock.call_count(URL), 2);
    }
}
