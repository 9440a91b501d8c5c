//! Application-level error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::callback::CallbackError;
use crate::domain::foundation::ErrorCode;
use crate::domain::request::ValidationError;
use crate::ports::HttpError;

/// Errors from fetching the payment method catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog fetch failed: {0}")]
    Http(#[from] HttpError),

    #[error("Catalog XML is malformed: {0}")]
    Xml(String),
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Invalid
    }
}

/// Any error the client can return.
///
/// Callers that handle several operations uniformly can convert into this
/// with `?`.
#[derive(Debug, Error)]
pub enum WebToPayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl WebToPayError {
    /// Machine-checkable code of the underlying error.
    pub fn code(&self) -> ErrorCode {
        match self {
            WebToPayError::Config(e) => e.code(),
            WebToPayError::Validation(e) => e.code(),
            WebToPayError::Callback(e) => e.code(),
            WebToPayError::Catalog(e) => e.code(),
        }
    }
}
