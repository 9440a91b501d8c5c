//! Payment method catalog provider.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::adapters::catalog::parse_payment_methods_xml;
use crate::config::Routes;
use crate::domain::catalog::{PaymentMethodList, PaymentMethodOptions};
use crate::ports::HttpClient;

use super::errors::CatalogError;

/// Fetches and caches payment method lists per currency and amount.
///
/// The cache lock is held for the duration of a fetch, so concurrent
/// requests never fetch the same list twice.
pub struct PaymentMethodListProvider {
    project_id: u64,
    routes: Routes,
    http: Arc<dyn HttpClient>,
    cache: Mutex<HashMap<String, PaymentMethodList>>,
}

impl PaymentMethodListProvider {
    pub fn new(project_id: u64, routes: Routes, http: Arc<dyn HttpClient>) -> Self {
        Self {
            project_id,
            routes,
            http,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the list for `options`, fetching it on a cache miss.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Http` if the fetch fails
    /// - `CatalogError::Xml` if the document is malformed
    pub async fn get_payment_method_list(
        &self,
        options: &PaymentMethodOptions,
    ) -> Result<PaymentMethodList, CatalogError> {
        let key = options.cache_key();
        let mut cache = self.cache.lock().await;

        if let Some(list) = cache.get(&key) {
            debug!(cache_key = %key, "Payment method list cache hit");
            return Ok(list.clone());
        }

        let currency = options.currency();
        let url = self
            .routes
            .payment_method_list_url(self.project_id, currency, options.amount);
        info!(url = %url, "Fetching payment method list");

        let xml = self.http.fetch(&url).await?;
        let list = parse_payment_methods_xml(&xml, self.project_id, currency).map_err(|e| {
            warn!(url = %url, error = %e, "Malformed payment method list");
            CatalogError::Xml(e.to_string())
        })?;

        cache.insert(key, list.clone());
        Ok(list)
    }

    /// Drops every cached list.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}

impl std::fmt::Debug for PaymentMethodListProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentMethodListProvider")
            .field("project_id", &self.project_id)
            .field("base_url", &self.routes.payment_method_list)
            .finish()
    }
}
