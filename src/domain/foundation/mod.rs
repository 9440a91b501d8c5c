//! Foundation module - Shared primitives.
//!
//! Contains the transport codec, cryptographic primitives and error codes
//! that the request and callback modules are built on. Nothing here logs
//! or performs I/O.

mod crypto;
mod encoding;
mod errors;

pub use crypto::{
    decrypt_aes_gcm, md5_hex, verify_rsa_signature, SignatureAlgorithm, GCM_NONCE_LEN,
    GCM_TAG_LEN,
};
pub use encoding::{
    decode_safe_url_base64, decode_safe_url_base64_bytes, encode_safe_url_base64, EncodingError,
};
pub use errors::ErrorCode;
