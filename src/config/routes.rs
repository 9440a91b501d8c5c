//! Environment routes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Gateway environment
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

/// Remote endpoints used by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routes {
    /// Provider's RSA public key (PEM)
    pub public_key: String,

    /// Payment page the buyer is redirected to
    pub payment: String,

    /// Payment method catalog base URL
    pub payment_method_list: String,
}

impl Routes {
    /// Default routes for an environment
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self {
                public_key: "https://www.paysera.com/download/public.key".to_string(),
                payment: "https://bank.paysera.com/pay/".to_string(),
                payment_method_list: "https://www.paysera.com/payment-methods/".to_string(),
            },
            Environment::Sandbox => Self {
                public_key: "https://sandbox.paysera.com/download/public.key".to_string(),
                payment: "https://sandbox.paysera.com/pay/".to_string(),
                payment_method_list: "https://sandbox.paysera.com/payment-methods/".to_string(),
            },
        }
    }

    /// Catalog URL for a project, currency and optional amount
    pub fn payment_method_list_url(&self, project_id: u64, currency: &str, amount: Option<u64>) -> String {
        let mut url = format!("{}{}/currency:{}", self.payment_method_list, project_id, currency);
        if let Some(amount) = amount {
            url.push_str(&format!("/amount:{}", amount));
        }
        url
    }
}

impl Default for Routes {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}
