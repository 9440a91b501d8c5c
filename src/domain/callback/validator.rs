//! Callback validation: integrity, decoding, tenant check and parsing.

use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};
use url::form_urlencoded;

use crate::domain::foundation::{decode_safe_url_base64, decode_safe_url_base64_bytes, decrypt_aes_gcm};

use super::errors::CallbackError;
use super::parsed::{ExpectedFields, ParsedCallback};
use super::query::CallbackQuery;
use super::sign_checker::{CallbackTransport, SignChecker};

/// Validates callbacks for one project.
///
/// Holds no mutable state; one instance can serve concurrent callbacks.
#[derive(Clone)]
pub struct CallbackValidator {
    project_id: u64,
    password: SecretString,
}

impl CallbackValidator {
    pub fn new(project_id: u64, password: SecretString) -> Self {
        Self {
            project_id,
            password,
        }
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    /// Validates a callback of either transport.
    ///
    /// Signed callbacks are verified with `checker`; callbacks without any
    /// signature field are decrypted with the project password.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage as a [`CallbackError`].
    pub fn validate_and_parse(
        &self,
        query: &CallbackQuery,
        checker: &dyn SignChecker,
    ) -> Result<ParsedCallback, CallbackError> {
        match CallbackTransport::select(query) {
            CallbackTransport::Signed(_) => self.validate_signed(query, checker),
            CallbackTransport::Encrypted => self.validate_encrypted(query),
        }
    }

    /// Verifies the signature, then decodes and parses the payload.
    ///
    /// # Errors
    ///
    /// - [`CallbackError::InvalidSignature`] if `checker` rejects the query
    /// - [`CallbackError::MalformedPayload`] if `data` does not decode
    /// - [`CallbackError::TenantMismatch`] if `projectid` is foreign
    pub fn validate_signed(
        &self,
        query: &CallbackQuery,
        checker: &dyn SignChecker,
    ) -> Result<ParsedCallback, CallbackError> {
        if !checker.check_sign(query) {
            return Err(CallbackError::InvalidSignature);
        }
        let payload = decode_safe_url_base64(&query.data)?;
        self.parse_payload(&payload)
    }

    /// Decrypts an AES-256-GCM payload, then parses it.
    ///
    /// # Errors
    ///
    /// - [`CallbackError::DecryptionFailed`] if decoding or decryption fails
    /// - [`CallbackError::TenantMismatch`] if `projectid` is foreign
    pub fn validate_encrypted(&self, query: &CallbackQuery) -> Result<ParsedCallback, CallbackError> {
        let blob = decode_safe_url_base64_bytes(&query.data)
            .map_err(|_| CallbackError::DecryptionFailed)?;
        let payload = decrypt_aes_gcm(&blob, self.password.expose_secret())
            .ok_or(CallbackError::DecryptionFailed)?;
        self.parse_payload(&payload)
    }

    /// Checks a parsed callback against caller-expected values.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::FieldMismatch`] for the first differing field.
    pub fn check_expected_fields(
        &self,
        parsed: &ParsedCallback,
        expected: &ExpectedFields,
    ) -> Result<(), CallbackError> {
        parsed.check_expected(expected)
    }

    fn parse_payload(&self, payload: &str) -> Result<ParsedCallback, CallbackError> {
        let fields = parse_query(payload);
        self.check_tenant(&fields)?;
        Ok(ParsedCallback::from_fields(fields))
    }

    fn check_tenant(&self, fields: &BTreeMap<String, String>) -> Result<(), CallbackError> {
        let Some(actual) = fields.get("projectid").filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        match actual.trim().parse::<u64>() {
            Ok(id) if id == self.project_id => Ok(()),
            _ => Err(CallbackError::TenantMismatch {
                expected: self.project_id,
                actual: actual.clone(),
            }),
        }
    }
}

impl std::fmt::Debug for CallbackValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackValidator")
            .field("project_id", &self.project_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Form-urlencoded fields; the last occurrence of a key wins.
fn parse_query(payload: &str) -> BTreeMap<String, String> {
    let payload = payload.strip_prefix('?').unwrap_or(payload);
    form_urlencoded::parse(payload.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
