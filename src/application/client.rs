//! Client facade tying configuration, signing, callbacks and the catalog
//! together.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::adapters::http::ReqwestHttpClient;
use crate::config::{ConfigError, GatewayConfig, Routes};
use crate::domain::callback::{
    CallbackError, CallbackQuery, CallbackTransport, CallbackValidator, ExpectedFields,
    ParsedCallback, RsaSignChecker, SignChecker, SignatureScheme, Ss1SignChecker,
};
use crate::domain::catalog::{PaymentMethodList, PaymentMethodOptions};
use crate::domain::request::{PaymentRequest, RequestSigner, SignedRequest, ValidationError};
use crate::ports::HttpClient;

use super::catalog::PaymentMethodListProvider;
use super::errors::CatalogError;
use super::public_key::PublicKeyCache;

/// Entry point for a single project.
///
/// Request building is synchronous. Callback validation is async only
/// because RSA-signed callbacks may need the provider's public key, which
/// is fetched once and cached for the life of the client.
///
/// # Example
///
/// ```no_run
/// use webtopay::application::WebToPayClient;
/// use webtopay::config::GatewayConfig;
/// use webtopay::domain::request::PaymentRequest;
///
/// let client = WebToPayClient::new(GatewayConfig::new(12345, "secret").sandbox())?;
/// let url = client.build_payment_url(
///     &PaymentRequest::new(
///         "ORD-1",
///         "https://shop.example/ok",
///         "https://shop.example/cancel",
///         "https://shop.example/callback",
///     )
///     .with_amount(1000)
///     .with_currency("EUR"),
/// )?;
/// println!("Redirect to {}", url);
/// # Ok::<(), webtopay::WebToPayError>(())
/// ```
pub struct WebToPayClient {
    project_id: u64,
    password: SecretString,
    routes: Routes,
    signer: RequestSigner,
    validator: CallbackValidator,
    public_key: PublicKeyCache,
    catalog: PaymentMethodListProvider,
}

impl WebToPayClient {
    /// Creates a client backed by the reqwest HTTP adapter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let http = ReqwestHttpClient::new(config.http_timeout())
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::with_parts(&config, Arc::new(http)))
    }

    /// Replaces the HTTP client used for the public key and the catalog.
    ///
    /// Any cached key or catalog data is discarded.
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.public_key = PublicKeyCache::new(self.routes.public_key.clone(), Arc::clone(&http));
        self.catalog = PaymentMethodListProvider::new(self.project_id, self.routes.clone(), http);
        self
    }

    fn with_parts(config: &GatewayConfig, http: Arc<dyn HttpClient>) -> Self {
        let routes = config.routes();
        Self {
            project_id: config.project_id,
            password: config.password.clone(),
            signer: RequestSigner::new(config.project_id, config.password.clone()),
            validator: CallbackValidator::new(config.project_id, config.password.clone()),
            public_key: PublicKeyCache::new(routes.public_key.clone(), Arc::clone(&http)),
            catalog: PaymentMethodListProvider::new(config.project_id, routes.clone(), http),
            routes,
        }
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    /// Effective routes, with configured overrides applied.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Outbound requests
    // ════════════════════════════════════════════════════════════════════════════

    /// Validates and signs a payment request.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn build_request(&self, request: &PaymentRequest) -> Result<SignedRequest, ValidationError> {
        self.signer.build_request(request)
    }

    /// Builds the redirect URL for a payment request.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn build_payment_url(&self, request: &PaymentRequest) -> Result<String, ValidationError> {
        self.signer.build_request_url(request, &self.routes.payment)
    }

    /// Signs a repeat request for an existing order.
    pub fn build_repeat_request(&self, order_id: &str, amount: u64, currency: &str) -> SignedRequest {
        self.signer.build_repeat_request(order_id, amount, currency)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Callbacks
    // ════════════════════════════════════════════════════════════════════════════

    /// Verifies and parses a payment-status callback.
    ///
    /// # Errors
    ///
    /// Returns a [`CallbackError`] for the first failing stage. A public key
    /// fetch failure is `PublicKeyUnavailable`.
    pub async fn validate_callback(&self, query: &CallbackQuery) -> Result<ParsedCallback, CallbackError> {
        let transport = CallbackTransport::select(query);
        debug!(project_id = self.project_id, transport = %transport, "Validating callback");

        let result = match transport {
            CallbackTransport::Encrypted => self.validator.validate_encrypted(query),
            CallbackTransport::Signed(scheme) => self
                .checker_for(scheme)
                .await
                .and_then(|checker| self.validator.validate_signed(query, checker.as_ref())),
        };

        match &result {
            Ok(parsed) => info!(
                order_id = parsed.order_id().unwrap_or_default(),
                status = ?parsed.status(),
                payment_type = %parsed.payment_type(),
                "Callback validated"
            ),
            Err(e) => warn!(
                transport = %transport,
                error = %e,
                "Callback rejected"
            ),
        }
        result
    }

    /// Verifies a callback, then checks it against expected field values.
    ///
    /// # Errors
    ///
    /// Any [`CallbackError`] from validation, or `FieldMismatch`.
    pub async fn validate_callback_with_expected(
        &self,
        query: &CallbackQuery,
        expected: &ExpectedFields,
    ) -> Result<ParsedCallback, CallbackError> {
        let parsed = self.validate_callback(query).await?;
        self.validator
            .check_expected_fields(&parsed, expected)
            .map_err(|e| {
                warn!(error = %e, "Callback does not match expected fields");
                e
            })?;
        Ok(parsed)
    }

    async fn checker_for(&self, scheme: SignatureScheme) -> Result<Box<dyn SignChecker>, CallbackError> {
        let checker: Box<dyn SignChecker> = match scheme {
            SignatureScheme::Ss1 => Box::new(Ss1SignChecker::new(self.password.clone())),
            SignatureScheme::Ss2 => Box::new(RsaSignChecker::ss2(self.public_key().await?)),
            SignatureScheme::Ss3 => Box::new(RsaSignChecker::ss3(self.public_key().await?)),
        };
        Ok(checker)
    }

    async fn public_key(&self) -> Result<&str, CallbackError> {
        self.public_key
            .get()
            .await
            .map_err(CallbackError::PublicKeyUnavailable)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Catalog
    // ════════════════════════════════════════════════════════════════════════════

    /// Payment methods available to the project.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the fetch or parse fails.
    pub async fn payment_methods(
        &self,
        options: &PaymentMethodOptions,
    ) -> Result<PaymentMethodList, CatalogError> {
        self.catalog.get_payment_method_list(options).await
    }

    /// Drops cached catalog lists.
    pub async fn clear_payment_methods_cache(&self) {
        self.catalog.clear_cache().await
    }
}

impl std::fmt::Debug for WebToPayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebToPayClient")
            .field("project_id", &self.project_id)
            .field("routes", &self.routes)
            .field("public_key", &self.public_key)
            .finish()
    }
}
