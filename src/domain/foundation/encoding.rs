//! URL-safe transport encoding for the `data` parameter.
//!
//! WebToPay carries its payload as standard base64 with `+` and `/` swapped
//! for `-` and `_`. Padding is kept on encode. Decoding accepts either
//! alphabet and tolerates missing padding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use thiserror::Error;

/// Standard alphabet, padding optional on decode.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors produced when decoding a transport token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The token is not valid base64.
    #[error("Invalid base64 payload")]
    InvalidBase64,

    /// The decoded bytes are not valid UTF-8.
    #[error("Decoded payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Encodes text into the URL-safe transport form.
pub fn encode_safe_url_base64(text: &str) -> String {
    STANDARD
        .encode(text.as_bytes())
        .replace('+', "-")
        .replace('/', "_")
}

/// Decodes a URL-safe transport token back into raw bytes.
pub fn decode_safe_url_base64_bytes(token: &str) -> Result<Vec<u8>, EncodingError> {
    let standard = token.replace('-', "+").replace('_', "/");
    LENIENT
        .decode(standard.trim())
        .map_err(|_| EncodingError::InvalidBase64)
}

/// Decodes a URL-safe transport token back into text.
pub fn decode_safe_url_base64(token: &str) -> Result<String, EncodingError> {
    let bytes = decode_safe_url_base64_bytes(token)?;
    String::from_utf8(bytes).map_err(|_| EncodingError::InvalidUtf8)
}
