//! Mock HTTP client for testing.
//!
//! Provides a configurable implementation of `HttpClient` for unit and
//! integration tests. Supports:
//! - Canned responses per URL
//! - Error injection
//! - Call tracking
//! - Artificial latency, for exercising concurrent callers

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{HttpClient, HttpError};

/// Mock HTTP client for testing.
///
/// Clones share state, so a test can keep a handle for assertions after
/// handing a clone to the client under test.
///
/// # Example
///
/// ```
/// use webtopay::adapters::http::MockHttpClient;
///
/// let mock = MockHttpClient::new();
/// mock.set_response("https://example.com/key", "PEM");
/// assert_eq!(mock.call_count("https://example.com/key"), 0);
/// ```
#[derive(Default, Clone)]
pub struct MockHttpClient {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Bodies by URL.
    responses: HashMap<String, String>,

    /// Errors by URL, returned on every call.
    url_errors: HashMap<String, HttpError>,

    /// Error for the next call to any URL (consumed).
    next_error: Option<HttpError>,

    /// Delay applied before answering.
    latency: Option<Duration>,

    /// URLs in call order.
    call_log: Vec<String>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Sets the body returned for `url`.
    pub fn set_response(&self, url: &str, body: impl Into<String>) {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert(url.to_string(), body.into());
    }

    /// Sets an error returned for every call to `url`.
    pub fn set_url_error(&self, url: &str, error: HttpError) {
        self.inner
            .lock()
            .unwrap()
            .url_errors
            .insert(url.to_string(), error);
    }

    /// Sets an error for the next call to any URL.
    pub fn set_error(&self, error: HttpError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Clears all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.url_errors.clear();
    }

    /// Delays every response.
    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().unwrap().latency = Some(latency);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// All requested URLs, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Number of requests made to `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|u| *u == url)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().call_log.clear();
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        let latency = {
            let mut state = self.inner.lock().unwrap();
            state.call_log.push(url.to_string());
            state.latency
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.inner.lock().unwrap();
        if let Some(error) = state.url_errors.get(url) {
            return Err(error.clone());
        }
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        state
            .responses
            .get(url)
            .cloned()
            .ok_or_else(|| HttpError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}
