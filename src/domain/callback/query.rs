//! Inbound callback wire shape.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Query parameters of a payment-status callback.
///
/// Which of `ss1`, `ss2`, `ss3` are present decides how the callback is
/// verified; there is no explicit version field. Empty values count as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Encoded (or encrypted) payload.
    pub data: String,
    /// MD5 keyed-hash signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss1: Option<String>,
    /// RSA/SHA-1 signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss2: Option<String>,
    /// RSA/SHA-256 signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss3: Option<String>,
}

impl CallbackQuery {
    /// Creates a query with only `data` set (the encrypted transport).
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn with_ss1(mut self, ss1: impl Into<String>) -> Self {
        self.ss1 = Some(ss1.into());
        self
    }

    pub fn with_ss2(mut self, ss2: impl Into<String>) -> Self {
        self.ss2 = Some(ss2.into());
        self
    }

    pub fn with_ss3(mut self, ss3: impl Into<String>) -> Self {
        self.ss3 = Some(ss3.into());
        self
    }

    /// Parses the callback out of a raw URL query string.
    ///
    /// A leading `?` is ignored and unknown parameters are dropped. A missing
    /// `data` parameter yields an empty payload, which fails verification.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut callback = CallbackQuery::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "data" => callback.data = value.into_owned(),
                "ss1" => callback.ss1 = Some(value.into_owned()),
                "ss2" => callback.ss2 = Some(value.into_owned()),
                "ss3" => callback.ss3 = Some(value.into_owned()),
                _ => {}
            }
        }
        callback
    }

    /// `ss1` when present and non-empty.
    pub fn ss1(&self) -> Option<&str> {
        present(&self.ss1)
    }

    /// `ss2` when present and non-empty.
    pub fn ss2(&self) -> Option<&str> {
        present(&self.ss2)
    }

    /// `ss3` when present and non-empty.
    pub fn ss3(&self) -> Option<&str> {
        present(&self.ss3)
    }

    /// True when any signature field is present.
    pub fn is_signed(&self) -> bool {
        self.ss1().is_some() || self.ss2().is_some() || self.ss3().is_some()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
