//! Outbound payment requests.
//!
//! # Module Structure
//!
//! - `spec` - Declarative field table and validation engine
//! - `params` - Insertion-ordered wire parameters
//! - `payment_request` - Typed request builder
//! - `signer` - Encoding and signing into a [`SignedRequest`]
//! - `errors` - [`ValidationError`]

mod errors;
mod params;
mod payment_request;
mod signer;
mod spec;

pub use errors::ValidationError;
pub use params::RequestParams;
pub use payment_request::PaymentRequest;
pub use signer::{RequestSigner, SignedRequest};
pub use spec::{RequestSchema, RequestSpec, PAYSERA_REQUEST_SPECS};

/// Protocol version sent with every request.
pub const API_VERSION: &str = "1.6";
