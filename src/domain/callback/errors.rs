//! Callback validation errors.

use thiserror::Error;

use crate::domain::foundation::{EncodingError, ErrorCode};
use crate::ports::HttpError;

/// Errors that occur while validating an inbound callback.
///
/// Every variant is terminal for the callback; nothing here is retried.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// The selected checker rejected the signature.
    #[error("Invalid callback signature")]
    InvalidSignature,

    /// Encrypted payload could not be decoded or decrypted.
    #[error("Failed to decrypt callback data")]
    DecryptionFailed,

    /// Payload belongs to a different project.
    #[error("Project ID mismatch: expected {expected}, got {actual}")]
    TenantMismatch { expected: u64, actual: String },

    /// A reconciled field differs from the caller's expectation.
    #[error(
        "Field {field} mismatch: expected {expected}, got {}",
        .actual.as_deref().unwrap_or("<missing>")
    )]
    FieldMismatch {
        field: String,
        expected: String,
        actual: Option<String>,
    },

    /// Signed payload is not valid base64 or UTF-8.
    #[error("Malformed callback data: {0}")]
    MalformedPayload(#[from] EncodingError),

    /// The provider's public key could not be fetched.
    #[error("Public key unavailable: {0}")]
    PublicKeyUnavailable(HttpError),
}

impl CallbackError {
    /// Machine-checkable code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Invalid
    }

    /// True for failures that indicate forged or tampered input.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            CallbackError::InvalidSignature
                | CallbackError::DecryptionFailed
                | CallbackError::TenantMismatch { .. }
        )
    }
}
