//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - `HttpClient` implementations (reqwest, mock)
//! - `catalog` - XML parsing of the payment method catalog

pub mod catalog;
pub mod http;

pub use catalog::parse_payment_methods_xml;
pub use http::{MockHttpClient, ReqwestHttpClient};
