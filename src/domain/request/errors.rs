//! Outbound request validation errors.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// A request field violated the request schema.
///
/// Validation is fail-fast, so this always describes the first violation
/// found in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent or empty.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A field is longer than its declared maximum.
    #[error("Field {field} exceeds maximum length of {max_len}")]
    ExceedsMaxLength { field: String, max_len: usize },

    /// A field does not match its declared format.
    #[error("Field {field} does not match expected format")]
    PatternMismatch { field: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::ExceedsMaxLength { field, .. }
            | ValidationError::PatternMismatch { field } => field,
        }
    }

    /// Machine-checkable code for this violation.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MissingField { .. } => ErrorCode::Missing,
            ValidationError::ExceedsMaxLength { .. } => ErrorCode::MaxLen,
            ValidationError::PatternMismatch { .. } => ErrorCode::Regexp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_displays_name() {
        let err = ValidationError::MissingField {
            field: "orderid".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: orderid");
        assert_eq!(err.field(), "orderid");
        assert_eq!(err.code(), ErrorCode::Missing);
    }

    #[test]
    fn max_length_displays_limit() {
        let err = ValidationError::ExceedsMaxLength {
            field: "orderid".to_string(),
            max_len: 40,
        };
        assert_eq!(
            err.to_string(),
            "Field orderid exceeds maximum length of 40"
        );
        assert_eq!(err.code(), ErrorCode::MaxLen);
    }

    #[test]
    fn pattern_mismatch_maps_to_regexp_code() {
        let err = ValidationError::PatternMismatch {
            field: "currency".to_string(),
        };
        assert_eq!(err.to_string(), "Field currency does not match expected format");
        assert_eq!(err.code(), ErrorCode::Regexp);
    }
}
