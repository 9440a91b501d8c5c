//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid URL for {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },

    #[error("Invalid HTTP timeout: {0}s")]
    InvalidTimeout(u64),

    #[error("HTTP client initialisation failed: {0}")]
    HttpClient(String),
}

impl ConfigError {
    /// Machine-checkable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::MissingRequired(_) => ErrorCode::Missing,
            _ => ErrorCode::Invalid,
        }
    }
}
