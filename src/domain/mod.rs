//! Domain layer containing the protocol logic and types.
//!
//! # Module Organization
//!
//! - `foundation` - Codec, crypto primitives and error codes
//! - `request` - Outbound payment requests: validation and signing
//! - `callback` - Inbound callbacks: scheme selection, verification, parsing
//! - `catalog` - Payment method catalog types

pub mod callback;
pub mod catalog;
pub mod foundation;
pub mod request;
