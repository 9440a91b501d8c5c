//! Application layer - Client facade and stateful services.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! It is the only layer that logs or performs I/O.

mod catalog;
mod client;
mod errors;
mod public_key;

pub use catalog::PaymentMethodListProvider;
pub use client::WebToPayClient;
pub use errors::{CatalogError, WebToPayError};
pub use public_key::PublicKeyCache;
