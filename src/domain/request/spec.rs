//! Declarative request schema and the validation engine.
//!
//! The field table is plain data. Adding a field or changing a limit is an
//! edit to [`PAYSERA_REQUEST_SPECS`] (or an extra spec passed to
//! [`RequestSchema::extended`]); [`RequestSchema::validate`] never changes.

use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::ValidationError;
use super::params::RequestParams;

/// Validation rule for one outbound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSpec {
    /// Field name as sent on the wire.
    pub field: &'static str,
    /// Maximum length in characters; `0` means unbounded.
    pub max_len: usize,
    /// Whether the field must be present and non-empty.
    pub required: bool,
    /// Optional format pattern the whole value must match.
    pub pattern: Option<&'static str>,
}

impl RequestSpec {
    /// A required field.
    pub const fn required(field: &'static str, max_len: usize) -> Self {
        Self {
            field,
            max_len,
            required: true,
            pattern: None,
        }
    }

    /// An optional field.
    pub const fn optional(field: &'static str, max_len: usize) -> Self {
        Self {
            field,
            max_len,
            required: false,
            pattern: None,
        }
    }

    /// Adds a format pattern.
    pub const fn matching(self, pattern: &'static str) -> Self {
        Self {
            pattern: Some(pattern),
            ..self
        }
    }
}

const DIGITS: &str = r"^[0-9]+$";
const BINARY_FLAG: &str = r"^[01]$";
const COUNTRY_CODE: &str = r"^[A-Z]{2}$";

/// Field table for WebToPay payment requests, in validation order.
pub const PAYSERA_REQUEST_SPECS: &[RequestSpec] = &[
    RequestSpec::required("projectid", 11).matching(DIGITS),
    RequestSpec::required("orderid", 40),
    RequestSpec::required("accepturl", 255),
    RequestSpec::required("cancelurl", 255),
    RequestSpec::required("callbackurl", 255),
    RequestSpec::required("version", 9).matching(r"^[0-9]+\.[0-9]+$"),
    RequestSpec::optional("lang", 3).matching(r"^[a-zA-Z]{3}$"),
    RequestSpec::optional("amount", 11).matching(DIGITS),
    RequestSpec::optional("currency", 3).matching(r"^[A-Z]{3}$"),
    RequestSpec::optional("payment", 20),
    RequestSpec::optional("country", 2).matching(COUNTRY_CODE),
    RequestSpec::optional("paytext", 255),
    RequestSpec::optional("p_firstname", 255),
    RequestSpec::optional("p_lastname", 255),
    RequestSpec::optional("p_email", 255),
    RequestSpec::optional("p_street", 255),
    RequestSpec::optional("p_city", 255),
    RequestSpec::optional("p_state", 20),
    RequestSpec::optional("p_zip", 20),
    RequestSpec::optional("p_countrycode", 2).matching(COUNTRY_CODE),
    RequestSpec::optional("test", 1).matching(BINARY_FLAG),
    RequestSpec::optional("time_limit", 19),
    RequestSpec::optional("personcode", 255),
    RequestSpec::optional("developerid", 11).matching(DIGITS),
    RequestSpec::optional("buyer_consent", 1).matching(BINARY_FLAG),
    RequestSpec::optional("only_payments", 0),
    RequestSpec::optional("disallow_payments", 0),
];

static PAYSERA_SCHEMA: Lazy<RequestSchema> = Lazy::new(|| {
    RequestSchema::new(PAYSERA_REQUEST_SPECS.iter().copied())
        .expect("built-in request patterns are valid regular expressions")
});

#[derive(Debug, Clone)]
struct CompiledSpec {
    spec: RequestSpec,
    pattern: Option<Regex>,
}

/// An ordered, compiled set of [`RequestSpec`]s.
#[derive(Debug, Clone)]
pub struct RequestSchema {
    specs: Vec<CompiledSpec>,
}

impl RequestSchema {
    /// Compiles a schema from specs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a spec's pattern does not compile.
    pub fn new(specs: impl IntoIterator<Item = RequestSpec>) -> Result<Self, regex::Error> {
        let specs = specs
            .into_iter()
            .map(|spec| {
                let pattern = spec.pattern.map(Regex::new).transpose()?;
                Ok(CompiledSpec { spec, pattern })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { specs })
    }

    /// The WebToPay payment request schema.
    pub fn paysera() -> &'static RequestSchema {
        &PAYSERA_SCHEMA
    }

    /// Returns a copy of this schema with `extra` specs appended.
    ///
    /// # Errors
    ///
    /// Returns the regex error if an extra pattern does not compile.
    pub fn extended(
        &self,
        extra: impl IntoIterator<Item = RequestSpec>,
    ) -> Result<Self, regex::Error> {
        let mut schema = self.clone();
        schema.specs.extend(RequestSchema::new(extra)?.specs);
        Ok(schema)
    }

    /// Specs in validation order.
    pub fn specs(&self) -> impl Iterator<Item = &RequestSpec> {
        self.specs.iter().map(|compiled| &compiled.spec)
    }

    /// Validates `params`, stopping at the first violation in schema order.
    ///
    /// Fields not named by the schema are ignored.
    ///
    /// # Errors
    ///
    /// - `MissingField` - a required field is absent or empty
    /// - `ExceedsMaxLength` - a value is longer than its limit
    /// - `PatternMismatch` - a value does not match its pattern
    pub fn validate(&self, params: &RequestParams) -> Result<(), ValidationError> {
        for CompiledSpec { spec, pattern } in &self.specs {
            let value = params.get(spec.field).filter(|v| !v.is_empty());

            let Some(value) = value else {
                if spec.required {
                    return Err(ValidationError::MissingField {
                        field: spec.field.to_string(),
                    });
                }
                continue;
            };

            if spec.max_len > 0 && value.chars().count() > spec.max_len {
                return Err(ValidationError::ExceedsMaxLength {
                    field: spec.field.to_string(),
                    max_len: spec.max_len,
                });
            }

            if let Some(pattern) = pattern {
                if !pattern.is_match(value) {
                    return Err(ValidationError::PatternMismatch {
                        field: spec.field.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for RequestSchema {
    fn default() -> Self {
        Self::paysera().clone()
    }
}
