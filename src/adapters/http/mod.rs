//! HTTP adapters implementing the `HttpClient` port.

mod mock_http_client;
mod reqwest_client;

pub use mock_http_client::MockHttpClient;
pub use reqwest_client::{ReqwestHttpClient, DEFAULT_TIMEOUT, MAX_REDIRECTS};
