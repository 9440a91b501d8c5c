//! Payment status codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Payment status reported by a callback.
///
/// The provider sends an integer. Codes 0-5 have names; any other code is
/// still representable so an unexpected value never rejects a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentStatus(i64);

impl PaymentStatus {
    /// Payment has not been executed.
    pub const NOT_EXECUTED: Self = Self(0);
    /// Payment was successful.
    pub const SUCCESSFUL: Self = Self(1);
    /// Payment order accepted, but not yet executed.
    pub const ACCEPTED: Self = Self(2);
    /// Additional payment information is required.
    pub const ADDITIONAL_INFO: Self = Self(3);
    /// Payment executed, but confirmation of funds will arrive later.
    pub const EXECUTED_NO_CONFIRMATION: Self = Self(4);
    /// Payment was refunded.
    pub const REFUNDED: Self = Self(5);

    /// Wraps a raw status code.
    pub const fn from_code(code: i64) -> Self {
        Self(code)
    }

    /// Parses the wire value. Returns `None` for non-numeric text.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(Self)
    }

    /// The raw integer code.
    pub const fn code(self) -> i64 {
        self.0
    }

    /// Constant name for known codes.
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("NOT_EXECUTED"),
            1 => Some("SUCCESSFUL"),
            2 => Some("ACCEPTED"),
            3 => Some("ADDITIONAL_INFO"),
            4 => Some("EXECUTED_NO_CONFIRMATION"),
            5 => Some("REFUNDED"),
            _ => None,
        }
    }

    /// True for codes 0-5.
    pub fn is_known(self) -> bool {
        self.name().is_some()
    }

    /// True when the money has been received.
    pub fn is_successful(self) -> bool {
        self == Self::SUCCESSFUL
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "UNKNOWN({})", self.0),
        }
    }
}
