//! Integration tests for `WebToPayClient`.
//!
//! The client is wired to `MockHttpClient`, so these tests exercise the full
//! path from configuration through the public key cache and the payment
//! method catalog without network access.
//!
//! Verifies:
//! - Payment URLs carry a payload and signature that decode back to the request
//! - RSA-signed callbacks fetch the public key once and then verify offline
//! - A failed key fetch is reported and retried on the next callback
//! - The catalog is fetched per currency/amount and cached until cleared

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use url::Url;

use webtopay::adapters::http::MockHttpClient;
use webtopay::domain::callback::CallbackQuery;
use webtopay::domain::catalog::PaymentMethodOptions;
use webtopay::domain::foundation::{decode_safe_url_base64, encode_safe_url_base64, md5_hex};
use webtopay::domain::request::PaymentRequest;
use webtopay::ports::HttpError;
use webtopay::{
    CallbackError, CatalogError, ExpectedFields, GatewayConfig, PaymentStatus, WebToPayClient,
    WebToPayError,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const PROJECT_ID: u64 = 12345;
const PASSWORD: &str = "S";
const PRIVATE_KEY: &str = include_str!("fixtures/rsa_private_key.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/rsa_public_key.pem");

const PUBLIC_KEY_URL: &str = "https://sandbox.paysera.com/download/public.key";
const CATALOG_EUR_URL: &str = "https://sandbox.paysera.com/payment-methods/12345/currency:EUR";

const CATALOG_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<payment_types_document project_id="12345">
</payment_types_document>"#;

const CATALOG_WITH_METHODS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<payment_types>
  <country code="LT">
    <title language="en">Lithuania</title>
    <title language="lt">Lietuva</title>
    <payment_group key="e-banking">
      <title language="en">E-banking</title>
      <payment_type key="hanza" min="10" max="1000000" currency="EUR" is_iban="1">
        <title language="en">SEB bank</title>
        <logo_url language="en">https://cdn.test/seb_en.png</logo_url>
      </payment_type>
      <payment_type key="vb2">
        <title language="en">Swedbank</title>
      </payment_type>
    </payment_group>
  </country>
  <country code="LV">
    <title language="en">Latvia</title>
  </country>
</payment_types>"#;

struct TestContext {
    client: WebToPayClient,
    http: MockHttpClient,
}

fn setup() -> TestContext {
    let http = MockHttpClient::new();
    http.set_response(PUBLIC_KEY_URL, PUBLIC_KEY);
    let client = WebToPayClient::new(GatewayConfig::new(PROJECT_ID, PASSWORD).sandbox())
        .unwrap()
        .with_http_client(Arc::new(http.clone()));
    TestContext { client, http }
}

fn sign_ss3(data: &str) -> String {
    let key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY).unwrap();
    let signature = key
        .sign(Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(data.as_bytes()))
        .unwrap();
    base64::engine::general_purpose::STANDARD.encode(signature)
}

fn sign_ss2(data: &str) -> String {
    let key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY).unwrap();
    let signature = key
        .sign(Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(data.as_bytes()))
        .unwrap();
    base64::engine::general_purpose::URL_SAFE.encode(signature)
}

fn shop_request(order_id: &str) -> PaymentRequest {
    PaymentRequest::new(
        order_id,
        "https://shop.test/accept",
        "https://shop.test/cancel",
        "https://shop.test/callback",
    )
}

// =============================================================================
// Outbound Requests
// =============================================================================

#[test]
fn payment_url_round_trips_through_the_codec() {
    let ctx = setup();
    let request = shop_request("ORD-100").with_amount(2500).with_currency("EUR");

    let url = Url::parse(&ctx.client.build_payment_url(&request).unwrap()).unwrap();
    assert_eq!(url.host_str(), Some("sandbox.paysera.com"));
    assert_eq!(url.path(), "/pay/");

    let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    let data = &pairs["data"];
    assert_eq!(pairs["sign"], md5_hex(data, PASSWORD));

    let payload = decode_safe_url_base64(data).unwrap();
    assert!(payload.contains("projectid=12345"));
    assert!(payload.contains("orderid=ORD-100"));
    assert!(payload.contains("amount=2500"));
    assert!(payload.contains("version=1.6"));
}

#[test]
fn invalid_payment_request_is_rejected_before_signing() {
    let ctx = setup();
    let request = shop_request("ORD-101").with_currency("euro");

    let error = ctx.client.build_payment_url(&request).unwrap_err();
    assert_eq!(error.field(), "currency");
}

#[test]
fn repeat_request_is_signed_with_project_password() {
    let ctx = setup();
    let signed = ctx.client.build_repeat_request("ORD-7", 990, "EUR");

    assert_eq!(signed.sign, md5_hex(&signed.data, PASSWORD));
    let payload = decode_safe_url_base64(&signed.data).unwrap();
    assert!(payload.contains("orderid=ORD-7"));
    assert!(payload.contains("repeat_request=1"));
}

// =============================================================================
// Callbacks
// =============================================================================

#[tokio::test]
async fn ss1_callback_needs_no_network() {
    let ctx = setup();
    let data = encode_safe_url_base64("projectid=12345&orderid=ORD-1&status=1&amount=1500&currency=EUR");
    let raw = format!("?data={}&ss1={}", data, md5_hex(&data, PASSWORD));

    let parsed = ctx
        .client
        .validate_callback(&CallbackQuery::from_query_str(&raw))
        .await
        .unwrap();

    assert_eq!(parsed.status(), Some(PaymentStatus::SUCCESSFUL));
    assert_eq!(ctx.http.total_calls(), 0);
}

#[tokio::test]
async fn ss3_callback_fetches_key_once() {
    let ctx = setup();

    for order in ["ORD-1", "ORD-2", "ORD-3"] {
        let data = encode_safe_url_base64(&format!("projectid=12345&orderid={}&status=1", order));
        let query = CallbackQuery::new(data.clone()).with_ss3(sign_ss3(&data));

        let parsed = ctx.client.validate_callback(&query).await.unwrap();
        assert_eq!(parsed.order_id(), Some(order));
    }

    assert_eq!(ctx.http.call_count(PUBLIC_KEY_URL), 1);
}

#[tokio::test]
async fn ss2_callback_accepts_url_safe_signature() {
    let ctx = setup();
    let data = encode_safe_url_base64("projectid=12345&orderid=ORD-2&status=2");
    let query = CallbackQuery::new(data.clone()).with_ss2(sign_ss2(&data));

    let parsed = ctx.client.validate_callback(&query).await.unwrap();
    assert_eq!(parsed.status(), Some(PaymentStatus::ACCEPTED));
}

#[tokio::test]
async fn concurrent_callbacks_share_one_key_fetch() {
    let ctx = setup();
    ctx.http.set_latency(Duration::from_millis(50));

    let data = encode_safe_url_base64("projectid=12345&orderid=ORD-C");
    let query = CallbackQuery::new(data.clone()).with_ss3(sign_ss3(&data));

    let (a, b, c) = tokio::join!(
        ctx.client.validate_callback(&query),
        ctx.client.validate_callback(&query),
        ctx.client.validate_callback(&query),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(ctx.http.call_count(PUBLIC_KEY_URL), 1);
}

#[tokio::test]
async fn key_fetch_failure_is_reported_then_retried() {
    let ctx = setup();
    ctx.http.set_error(HttpError::Timeout);

    let data = encode_safe_url_base64("projectid=12345&orderid=ORD-K");
    let query = CallbackQuery::new(data.clone()).with_ss3(sign_ss3(&data));

    let error = ctx.client.validate_callback(&query).await.unwrap_err();
    assert!(matches!(
        error,
        CallbackError::PublicKeyUnavailable(HttpError::Timeout)
    ));

    let parsed = ctx.client.validate_callback(&query).await.unwrap();
    assert_eq!(parsed.order_id(), Some("ORD-K"));
    assert_eq!(ctx.http.call_count(PUBLIC_KEY_URL), 2);
}

#[tokio::test]
async fn forged_ss3_signature_is_rejected() {
    let ctx = setup();
    let data = encode_safe_url_base64("projectid=12345&orderid=ORD-F");
    let other = encode_safe_url_base64("projectid=12345&orderid=ORD-G");
    let query = CallbackQuery::new(data).with_ss3(sign_ss3(&other));

    let error = ctx.client.validate_callback(&query).await.unwrap_err();
    assert!(matches!(error, CallbackError::InvalidSignature));
}

#[tokio::test]
async fn expected_fields_are_reconciled_after_verification() {
    let ctx = setup();
    let data = encode_safe_url_base64("projectid=12345&orderid=ORD-1&amount=1500&currency=EUR");
    let query = CallbackQuery::new(data.clone()).with_ss1(md5_hex(&data, PASSWORD));

    let ok = ExpectedFields::new()
        .with("orderid", "ORD-1")
        .with("amount", 1500);
    assert!(ctx
        .client
        .validate_callback_with_expected(&query, &ok)
        .await
        .is_ok());

    let wrong = ExpectedFields::new().with("amount", 1600);
    let error = ctx
        .client
        .validate_callback_with_expected(&query, &wrong)
        .await
        .unwrap_err();
    assert!(matches!(error, CallbackError::FieldMismatch { .. }));

    let wrapped: WebToPayError = error.into();
    assert_eq!(wrapped.code().as_u8(), 4);
}

// =============================================================================
// Payment Method Catalog
// =============================================================================

#[tokio::test]
async fn catalog_is_parsed_and_cached() {
    let ctx = setup();
    ctx.http.set_response(CATALOG_EUR_URL, CATALOG_WITH_METHODS_XML);

    let options = PaymentMethodOptions::new();
    let list = ctx.client.payment_methods(&options).await.unwrap();

    assert_eq!(list.project_id, 12345);
    assert_eq!(list.currency, "EUR");
    assert_eq!(list.country_codes(), vec!["LT", "LV"]);

    let lithuania = list.country("lt").unwrap();
    assert_eq!(lithuania.title.get("lt"), Some("Lietuva"));
    let seb = lithuania.group("e-banking").unwrap().method("hanza").unwrap();
    assert_eq!(seb.min_amount, Some(10));
    assert!(seb.is_iban);
    assert_eq!(seb.logo_url_in("de"), Some("https://cdn.test/seb_en.png"));
    assert_eq!(lithuania.methods().count(), 2);

    ctx.client.payment_methods(&options).await.unwrap();
    assert_eq!(ctx.http.call_count(CATALOG_EUR_URL), 1);

    ctx.client.clear_payment_methods_cache().await;
    ctx.client.payment_methods(&options).await.unwrap();
    assert_eq!(ctx.http.call_count(CATALOG_EUR_URL), 2);
}

#[tokio::test]
async fn catalog_with_amount_uses_its_own_url() {
    let ctx = setup();
    let url = format!("{}/amount:5000", CATALOG_EUR_URL);
    ctx.http.set_response(&url, CATALOG_WITH_METHODS_XML);

    let options = PaymentMethodOptions::new().with_amount(5000);
    let list = ctx.client.payment_methods(&options).await.unwrap();

    assert_eq!(list.countries.len(), 2);
    assert_eq!(ctx.http.call_count(&url), 1);
    assert_eq!(ctx.http.call_count(CATALOG_EUR_URL), 0);
}

#[tokio::test]
async fn catalog_with_unknown_root_is_empty() {
    let ctx = setup();
    ctx.http.set_response(CATALOG_EUR_URL, CATALOG_XML);

    let list = ctx
        .client
        .payment_methods(&PaymentMethodOptions::new())
        .await
        .unwrap();
    assert!(list.countries.is_empty());
}

#[tokio::test]
async fn catalog_http_failure_is_not_cached() {
    let ctx = setup();
    ctx.http.set_response(CATALOG_EUR_URL, CATALOG_WITH_METHODS_XML);
    ctx.http.set_error(HttpError::Status {
        status: 503,
        url: CATALOG_EUR_URL.to_string(),
    });

    let options = PaymentMethodOptions::new();
    let error = ctx.client.payment_methods(&options).await.unwrap_err();
    assert!(matches!(
        error,
        CatalogError::Http(HttpError::Status { status: 503, .. })
    ));

    let list = ctx.client.payment_methods(&options).await.unwrap();
    assert_eq!(list.countries.len(), 2);
}
