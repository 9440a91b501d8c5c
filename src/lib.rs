//! WebToPay - Paysera payment gateway integration
//!
//! Builds signed payment requests, verifies and decodes payment-status
//! callbacks, and fetches the payment method catalog.
//!
//! # Layout
//!
//! - `domain` - Protocol logic: codec, crypto, request signing, callbacks
//! - `ports` - The `HttpClient` contract
//! - `adapters` - reqwest and mock HTTP clients, catalog XML parsing
//! - `application` - [`WebToPayClient`] and its cached services
//! - `config` - [`GatewayConfig`] loaded from the environment

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{CatalogError, WebToPayClient, WebToPayError};
pub use config::{ConfigError, Environment, GatewayConfig, Routes};
pub use domain::callback::{
    CallbackError, CallbackQuery, ExpectedFields, ParsedCallback, PaymentStatus, PaymentType,
};
pub use domain::foundation::ErrorCode;
pub use domain::request::{PaymentRequest, SignedRequest, ValidationError};
