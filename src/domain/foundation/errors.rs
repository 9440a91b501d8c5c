//! Error codes shared by every WebToPay error type.

use std::fmt;

use serde::Serialize;

/// Machine-checkable error codes.
///
/// The numeric values match the codes used by the WebToPay library family,
/// so they can be logged or returned to callers that already know them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A required field is missing or empty.
    Missing = 1,

    /// A field exceeds its maximum length.
    MaxLen = 2,

    /// A field does not match its format pattern.
    Regexp = 3,

    /// The data is invalid (signature, decryption, tenant or field mismatch).
    Invalid = 4,
}

impl ErrorCode {
    /// Returns the numeric value of the code.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Missing => "E_MISSING",
            ErrorCode::MaxLen => "E_MAXLEN",
            ErrorCode::Regexp => "E_REGEXP",
            ErrorCode::Invalid => "E_INVALID",
        };
        write!(f, "{}", s)
    }
}
