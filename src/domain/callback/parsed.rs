//! Decoded callback payload.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::CallbackError;
use super::status::PaymentStatus;

/// Kind of payment a callback reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// SMS micropayment. Carries `to` and `from`.
    Micro,
    /// Bank or card payment.
    Macro,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Micro => "micro",
            PaymentType::Macro => "macro",
        }
    }

    /// Parses the explicit `type` field.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "micro" => Some(PaymentType::Micro),
            "macro" => Some(PaymentType::Macro),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A verified, decoded callback.
///
/// Every payload field is kept as a string, so fields the provider adds later
/// are preserved. Typed accessors cover the common ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCallback {
    #[serde(rename = "type")]
    payment_type: PaymentType,
    status: Option<PaymentStatus>,
    fields: BTreeMap<String, String>,
}

impl ParsedCallback {
    /// Builds a callback from decoded payload fields.
    ///
    /// The payment type comes from a recognised `type` field, or else is
    /// derived: non-empty `to` and `from` mean micro, anything else macro.
    /// A derived type is written back under `type`.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        let explicit = fields.get("type").and_then(|raw| PaymentType::parse(raw));
        let payment_type = match explicit {
            Some(payment_type) => payment_type,
            None => {
                let derived = if non_empty(&fields, "to") && non_empty(&fields, "from") {
                    PaymentType::Micro
                } else {
                    PaymentType::Macro
                };
                if !non_empty(&fields, "type") {
                    fields.insert("type".to_string(), derived.as_str().to_string());
                }
                derived
            }
        };

        let status = fields.get("status").and_then(|raw| PaymentStatus::parse(raw));

        Self {
            payment_type,
            status,
            fields,
        }
    }

    /// Raw value of any payload field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// String form of a field for reconciliation.
    ///
    /// `status` renders its numeric code when it parsed; everything else is
    /// the raw value.
    pub fn field(&self, name: &str) -> Option<String> {
        match (name, self.status) {
            ("status", Some(status)) => Some(status.code().to_string()),
            _ => self.get(name).map(str::to_string),
        }
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    /// Numeric status, `None` when absent or non-numeric.
    pub fn status(&self) -> Option<PaymentStatus> {
        self.status
    }

    pub fn project_id(&self) -> Option<&str> {
        self.get("projectid")
    }

    pub fn order_id(&self) -> Option<&str> {
        self.get("orderid")
    }

    /// Amount in minor units when it is a valid integer.
    pub fn amount(&self) -> Option<u64> {
        self.get("amount").and_then(|v| v.trim().parse().ok())
    }

    pub fn currency(&self) -> Option<&str> {
        self.get("currency")
    }

    /// Amount actually paid, which may differ in currency from the order.
    pub fn pay_amount(&self) -> Option<u64> {
        self.get("payamount").and_then(|v| v.trim().parse().ok())
    }

    pub fn pay_currency(&self) -> Option<&str> {
        self.get("paycurrency")
    }

    pub fn payment(&self) -> Option<&str> {
        self.get("payment")
    }

    pub fn request_id(&self) -> Option<&str> {
        self.get("requestid")
    }

    pub fn version(&self) -> Option<&str> {
        self.get("version")
    }

    /// True when the provider flagged this as a test payment.
    pub fn is_test(&self) -> bool {
        self.get("test") == Some("1")
    }

    /// All payload fields, including the written-back `type`.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// Checks that every expected field matches this callback.
    ///
    /// Comparison is on string forms, so `1500` and `"1500"` are equal.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::FieldMismatch`] for the first field that
    /// differs or is missing.
    pub fn check_expected(&self, expected: &ExpectedFields) -> Result<(), CallbackError> {
        for (field, expected_value) in expected.iter() {
            let actual = self.field(field);
            if actual.as_deref() != Some(expected_value) {
                return Err(CallbackError::FieldMismatch {
                    field: field.to_string(),
                    expected: expected_value.to_string(),
                    actual,
                });
            }
        }
        Ok(())
    }
}

fn non_empty(fields: &BTreeMap<String, String>, key: &str) -> bool {
    fields.get(key).is_some_and(|v| !v.is_empty())
}

/// Caller-expected values for reconciliation, checked in insertion order.
///
/// # Example
///
/// ```
/// use webtopay::domain::callback::ExpectedFields;
///
/// let expected = ExpectedFields::new()
///     .with("orderid", "ORD-1")
///     .with("amount", 1500)
///     .with("currency", "EUR");
///
/// assert_eq!(expected.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedFields {
    entries: Vec<(String, String)>,
}

impl ExpectedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an expectation. Values are compared by their `Display` form.
    pub fn with(mut self, field: impl Into<String>, value: impl fmt::Display) -> Self {
        let field = field.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for ExpectedFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ExpectedFields::new(), |acc, (k, v)| acc.with(k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ══════════════════════════════════════════════════════════════
    // Type inference
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn to_and_from_mean_micro() {
        let parsed = ParsedCallback::from_fields(fields(&[("to", "1398"), ("from", "37060000000")]));
        assert_eq!(parsed.payment_type(), PaymentType::Micro);
        assert_eq!(parsed.get("type"), Some("micro"));
    }

    #[test]
    fn missing_either_means_macro() {
        let only_to = ParsedCallback::from_fields(fields(&[("to", "1398")]));
        let only_from = ParsedCallback::from_fields(fields(&[("from", "370")]));
        let neither = ParsedCallback::from_fields(fields(&[("orderid", "1")]));

        assert_eq!(only_to.payment_type(), PaymentType::Macro);
        assert_eq!(only_from.payment_type(), PaymentType::Macro);
        assert_eq!(neither.get("type"), Some("macro"));
    }

    #[test]
    fn empty_to_counts_as_absent() {
        let parsed = ParsedCallback::from_fields(fields(&[("to", ""), ("from", "370")]));
        assert_eq!(parsed.payment_type(), PaymentType::Macro);
    }

    #[test]
    fn explicit_type_overrides_inference() {
        let parsed = ParsedCallback::from_fields(fields(&[
            ("type", "macro"),
            ("to", "1398"),
            ("from", "370"),
        ]));
        assert_eq!(parsed.payment_type(), PaymentType::Macro);
    }

    #[test]
    fn unrecognised_explicit_type_is_kept_raw() {
        let parsed = ParsedCallback::from_fields(fields(&[("type", "mobile")]));
        assert_eq!(parsed.payment_type(), PaymentType::Macro);
        assert_eq!(parsed.get("type"), Some("mobile"));
    }

    // ══════════════════════════════════════════════════════════════
    // Status and accessors
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn numeric_status_is_converted() {
        let parsed = ParsedCallback::from_fields(fields(&[("status", "1")]));
        assert_eq!(parsed.status(), Some(PaymentStatus::SUCCESSFUL));
    }

    #[test]
    fn non_numeric_status_keeps_raw_text() {
        let parsed = ParsedCallback::from_fields(fields(&[("status", "ok")]));
        assert_eq!(parsed.status(), None);
        assert_eq!(parsed.field("status"), Some("ok".to_string()));
    }

    #[test]
    fn typed_accessors_read_fields() {
        let parsed = ParsedCallback::from_fields(fields(&[
            ("projectid", "12345"),
            ("orderid", "ORD-1"),
            ("amount", "1500"),
            ("currency", "EUR"),
            ("payamount", "1500"),
            ("paycurrency", "EUR"),
            ("test", "1"),
            ("custom", "kept"),
        ]));

        assert_eq!(parsed.project_id(), Some("12345"));
        assert_eq!(parsed.order_id(), Some("ORD-1"));
        assert_eq!(parsed.amount(), Some(1500));
        assert_eq!(parsed.currency(), Some("EUR"));
        assert_eq!(parsed.pay_amount(), Some(1500));
        assert_eq!(parsed.pay_currency(), Some("EUR"));
        assert!(parsed.is_test());
        assert_eq!(parsed.get("custom"), Some("kept"));
    }

    // ══════════════════════════════════════════════════════════════
    // Reconciliation
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn matching_expectations_pass() {
        let parsed = ParsedCallback::from_fields(fields(&[
            ("orderid", "ORD-1"),
            ("amount", "1500"),
            ("status", "1"),
        ]));
        let expected = ExpectedFields::new()
            .with("orderid", "ORD-1")
            .with("amount", 1500)
            .with("status", PaymentStatus::SUCCESSFUL.code())
            .with("type", PaymentType::Macro);

        assert!(parsed.check_expected(&expected).is_ok());
    }

    #[test]
    fn first_mismatch_is_reported() {
        let parsed = ParsedCallback::from_fields(fields(&[("amount", "1500"), ("currency", "EUR")]));
        let expected = ExpectedFields::new().with("amount", 1600).with("currency", "USD");

        match parsed.check_expected(&expected) {
            Err(CallbackError::FieldMismatch {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "amount");
                assert_eq!(expected, "1600");
                assert_eq!(actual, Some("1500".to_string()));
            }
            other => panic!("Expected FieldMismatch, got {:?}", other),
        }
    }

    #[test]
    fn absent_field_is_a_mismatch() {
        let parsed = ParsedCallback::from_fields(fields(&[("orderid", "ORD-1")]));
        let expected = ExpectedFields::new().with("currency", "EUR");

        assert!(matches!(
            parsed.check_expected(&expected),
            Err(CallbackError::FieldMismatch { actual: None, .. })
        ));
    }

    #[test]
    fn repeated_expectation_replaces_value() {
        let expected = ExpectedFields::new().with("amount", 1).with("amount", 2);
        assert_eq!(expected.len(), 1);
        assert_eq!(expected.iter().next(), Some(("amount", "2")));
    }

    #[test]
    fn serializes_type_and_status() {
        let parsed = ParsedCallback::from_fields(fields(&[("status", "1")]));
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["type"], "macro");
        assert_eq!(json["status"], 1);
    }
}
