//! Signed payment request construction.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::domain::foundation::{encode_safe_url_base64, md5_hex};

use super::errors::ValidationError;
use super::params::RequestParams;
use super::payment_request::PaymentRequest;
use super::spec::RequestSchema;
use super::API_VERSION;

/// An encoded request payload and its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRequest {
    /// URL-safe base64 of the canonical query string.
    pub data: String,
    /// `md5_hex(data || password)`.
    pub sign: String,
}

impl SignedRequest {
    /// Appends `data` and `sign` to a payment endpoint.
    pub fn to_url(&self, base_url: &str) -> String {
        format!(
            "{}?data={}&sign={}",
            base_url,
            url_encode(&self.data),
            url_encode(&self.sign)
        )
    }
}

fn url_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Builds signed requests for one project.
///
/// Output is deterministic: the same input always yields byte-identical
/// `data` and `sign`.
#[derive(Clone)]
pub struct RequestSigner {
    project_id: u64,
    password: SecretString,
    schema: Arc<RequestSchema>,
}

impl RequestSigner {
    /// Creates a signer using the WebToPay request schema.
    pub fn new(project_id: u64, password: SecretString) -> Self {
        Self {
            project_id,
            password,
            schema: Arc::new(RequestSchema::paysera().clone()),
        }
    }

    /// Replaces the validation schema.
    pub fn with_schema(mut self, schema: RequestSchema) -> Self {
        self.schema = Arc::new(schema);
        self
    }

    /// Validates and signs a payment request.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in schema order.
    pub fn build_request(&self, request: &PaymentRequest) -> Result<SignedRequest, ValidationError> {
        self.sign_params(request.to_params())
    }

    /// Validates and signs raw parameters.
    ///
    /// `projectid` and `version` are always set by the signer and override
    /// any caller-provided values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in schema order.
    pub fn sign_params(&self, mut params: RequestParams) -> Result<SignedRequest, ValidationError> {
        params.set("projectid", self.project_id.to_string());
        params.set("version", API_VERSION);

        self.schema.validate(&params)?;

        Ok(self.create_request(&params))
    }

    /// Validates and signs a request, returning the full redirect URL.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in schema order.
    pub fn build_request_url(
        &self,
        request: &PaymentRequest,
        payment_url: &str,
    ) -> Result<String, ValidationError> {
        Ok(self.build_request(request)?.to_url(payment_url))
    }

    /// Signs a repeat request for an existing order.
    ///
    /// The field set is fixed and carries no redirect URLs, so it is not run
    /// through the request schema.
    pub fn build_repeat_request(&self, order_id: &str, amount: u64, currency: &str) -> SignedRequest {
        let params = RequestParams::new()
            .with("projectid", self.project_id.to_string())
            .with("orderid", order_id)
            .with("version", API_VERSION)
            .with("amount", amount.to_string())
            .with("currency", currency)
            .with("repeat_request", "1");

        self.create_request(&params)
    }

    fn create_request(&self, params: &RequestParams) -> SignedRequest {
        let data = encode_safe_url_base64(&params.to_query_string());
        let sign = md5_hex(&data, self.password.expose_secret());
        SignedRequest { data, sign }
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("project_id", &self.project_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::decode_safe_url_base64;

    const PROJECT_ID: u64 = 12345;
    const PASSWORD: &str = "secret_password";

    fn signer() -> RequestSigner {
        RequestSigner::new(PROJECT_ID, SecretString::new(PASSWORD.to_string()))
    }

    fn request() -> PaymentRequest {
        PaymentRequest::new(
            "ORD-1",
            "https://example.com/ok",
            "https://example.com/cancel",
            "https://example.com/cb",
        )
    }

    // ══════════════════════════════════════════════════════════════
    // build_request
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn signs_encoded_data_with_password() {
        let signed = signer()
            .build_request(&request().with_amount(1000).with_currency("EUR"))
            .unwrap();

        assert_eq!(signed.sign, md5_hex(&signed.data, PASSWORD));
        assert!(!signed.data.contains('+'));
        assert!(!signed.data.contains('/'));
    }

    #[test]
    fn data_decodes_to_canonical_query_string() {
        let signed = signer()
            .build_request(&request().with_amount(1000).with_currency("EUR"))
            .unwrap();

        let query = decode_safe_url_base64(&signed.data).unwrap();
        assert_eq!(
            query,
            "orderid=ORD-1\
             &accepturl=https%3A%2F%2Fexample.com%2Fok\
             &cancelurl=https%3A%2F%2Fexample.com%2Fcancel\
             &callbackurl=https%3A%2F%2Fexample.com%2Fcb\
             &amount=1000&currency=EUR&projectid=12345&version=1.6"
        );
    }

    #[test]
    fn output_is_deterministic() {
        let a = signer().build_request(&request().with_amount(5)).unwrap();
        let b = signer().build_request(&request().with_amount(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn caller_cannot_override_project_or_version() {
        let signed = signer()
            .build_request(&request().with_param("projectid", "999").with_param("version", "9.9"))
            .unwrap();

        let query = decode_safe_url_base64(&signed.data).unwrap();
        assert!(query.contains("projectid=12345"));
        assert!(query.contains("version=1.6"));
        assert!(!query.contains("999"));
    }

    #[test]
    fn validation_errors_propagate_verbatim() {
        let result = signer().build_request(&request().with_currency("euro"));
        assert_eq!(
            result,
            Err(ValidationError::ExceedsMaxLength {
                field: "currency".to_string(),
                max_len: 3
            })
        );
    }

    #[test]
    fn missing_required_url_fails() {
        let mut req = request();
        req.callbackurl.clear();
        assert!(matches!(
            signer().build_request(&req),
            Err(ValidationError::MissingField { field }) if field == "callbackurl"
        ));
    }

    // ══════════════════════════════════════════════════════════════
    // URLs and repeat requests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn builds_payment_url() {
        let url = signer()
            .build_request_url(&request(), "https://bank.paysera.com/pay/")
            .unwrap();
        let signed = signer().build_request(&request()).unwrap();

        assert!(url.starts_with("https://bank.paysera.com/pay/?data="));
        assert!(url.ends_with(&format!("&sign={}", signed.sign)));
    }

    #[test]
    fn url_encodes_padding() {
        let signed = SignedRequest {
            data: "YQ==".to_string(),
            sign: "abc".to_string(),
        };
        assert_eq!(signed.to_url("https://pay/"), "https://pay/?data=YQ%3D%3D&sign=abc");
    }

    #[test]
    fn repeat_request_has_fixed_fields() {
        let signed = signer().build_repeat_request("ORD-1", 2000, "EUR");

        assert_eq!(signed.sign, md5_hex(&signed.data, PASSWORD));
        assert_eq!(
            decode_safe_url_base64(&signed.data).unwrap(),
            "projectid=12345&orderid=ORD-1&version=1.6&amount=2000&currency=EUR&repeat_request=1"
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", signer());
        assert!(!rendered.contains(PASSWORD));
        assert!(rendered.contains("12345"));
    }
}
