//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `HttpClient` - Fetches the public key and the payment method catalog

mod http_client;

pub use http_client::{HttpClient, HttpError};
