//! Gateway configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `WEBTOPAY` prefix and a double underscore separator.
//!
//! # Example
//!
//! ```no_run
//! use webtopay::config::GatewayConfig;
//!
//! let config = GatewayConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Payments go to {}", config.routes().payment);
//! ```

mod error;
mod routes;

pub use error::ConfigError;
pub use routes::{Environment, Routes};

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Upper bound for the HTTP timeout, in seconds
const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

/// Gateway configuration
///
/// Load from the environment with [`GatewayConfig::load()`] or build in code
/// with [`GatewayConfig::new()`] and the `with_*` methods.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Project id issued by the provider
    #[serde(default)]
    pub project_id: u64,

    /// Project password used for signing and decryption
    #[serde(default = "empty_secret")]
    pub password: SecretString,

    /// Production or sandbox
    #[serde(default)]
    pub environment: Environment,

    /// Payment page override
    pub payment_url: Option<String>,

    /// Public key URL override
    pub public_key_url: Option<String>,

    /// Payment method catalog URL override
    pub payment_method_list_url: Option<String>,

    /// Timeout for public key and catalog fetches, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl GatewayConfig {
    /// Configuration for a project with production defaults
    pub fn new(project_id: u64, password: impl Into<String>) -> Self {
        Self {
            project_id,
            password: SecretString::new(password.into()),
            environment: Environment::default(),
            payment_url: None,
            public_key_url: None,
            payment_method_list_url: None,
            http_timeout_secs: default_http_timeout(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `WEBTOPAY` prefix
    /// 3. Deserializes into [`GatewayConfig`]
    ///
    /// # Environment Variable Format
    ///
    /// - `WEBTOPAY__PROJECT_ID=12345` -> `project_id = 12345`
    /// - `WEBTOPAY__ENVIRONMENT=sandbox` -> `environment = Sandbox`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if values cannot be parsed into expected
    /// types. Missing values are reported by [`GatewayConfig::validate()`].
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WEBTOPAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// - `MissingRequired` for a zero project id or empty password
    /// - `InvalidUrl` for an override that is not an absolute http(s) URL
    /// - `InvalidTimeout` for a timeout outside 1..=300 seconds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id == 0 {
            return Err(ConfigError::MissingRequired("PROJECT_ID"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(ConfigError::MissingRequired("PASSWORD"));
        }

        let overrides = [
            ("PAYMENT_URL", &self.payment_url),
            ("PUBLIC_KEY_URL", &self.public_key_url),
            ("PAYMENT_METHOD_LIST_URL", &self.payment_method_list_url),
        ];
        for (field, value) in overrides {
            if let Some(url) = non_empty(value) {
                validate_url(field, url)?;
            }
        }

        if self.http_timeout_secs == 0 || self.http_timeout_secs > MAX_HTTP_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout(self.http_timeout_secs));
        }
        Ok(())
    }

    /// Switch to the sandbox environment
    pub fn sandbox(mut self) -> Self {
        self.environment = Environment::Sandbox;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_payment_url(mut self, url: impl Into<String>) -> Self {
        self.payment_url = Some(url.into());
        self
    }

    pub fn with_public_key_url(mut self, url: impl Into<String>) -> Self {
        self.public_key_url = Some(url.into());
        self
    }

    pub fn with_payment_method_list_url(mut self, url: impl Into<String>) -> Self {
        self.payment_method_list_url = Some(url.into());
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout_secs = timeout.as_secs();
        self
    }

    /// Environment routes with any overrides applied
    pub fn routes(&self) -> Routes {
        let mut routes = Routes::for_environment(self.environment);
        if let Some(url) = non_empty(&self.payment_url) {
            routes.payment = url.to_string();
        }
        if let Some(url) = non_empty(&self.public_key_url) {
            routes.public_key = url.to_string();
        }
        if let Some(url) = non_empty(&self.payment_method_list_url) {
            routes.payment_method_list = url.to_string();
        }
        routes
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        field,
        url: value.to_string(),
    };
    let parsed = url::Url::parse(value).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid()),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_http_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info,webtopay=debug".to_string()
}
