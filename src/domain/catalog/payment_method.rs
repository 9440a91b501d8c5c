//! Payment method catalog types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Language used when a text has no `language` attribute, and the fallback
/// for lookups.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Currency requested when the caller does not specify one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Text keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text for a language, replacing any earlier value.
    pub fn insert(&mut self, language: impl Into<String>, text: impl Into<String>) {
        self.0.insert(language.into(), text.into());
    }

    /// Text in exactly this language.
    pub fn exact(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    /// Text in `language`, falling back to English.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.exact(language).or_else(|| self.exact(DEFAULT_LANGUAGE))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A single payment method, such as one bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub key: String,
    pub title: LocalizedText,
    pub logo_url: LocalizedText,
    /// Minimum amount in minor units.
    pub min_amount: Option<u64>,
    /// Maximum amount in minor units.
    pub max_amount: Option<u64>,
    pub currency: Option<String>,
    pub is_iban: bool,
    pub base_currency: Option<String>,
}

impl PaymentMethod {
    /// True when `amount` lies within the method's limits.
    ///
    /// Missing limits are unbounded.
    pub fn is_available_for(&self, amount: u64) -> bool {
        self.min_amount.map_or(true, |min| amount >= min)
            && self.max_amount.map_or(true, |max| amount <= max)
    }

    pub fn title_in(&self, language: &str) -> Option<&str> {
        self.title.get(language)
    }

    pub fn logo_url_in(&self, language: &str) -> Option<&str> {
        self.logo_url.get(language)
    }
}

/// Methods grouped by kind, such as e-banking or cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodGroup {
    pub key: String,
    pub title: LocalizedText,
    pub methods: Vec<PaymentMethod>,
}

impl PaymentMethodGroup {
    pub fn method(&self, key: &str) -> Option<&PaymentMethod> {
        self.methods.iter().find(|m| m.key == key)
    }
}

/// Groups available in one country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodCountry {
    /// Two-letter country code.
    pub code: String,
    pub title: LocalizedText,
    pub groups: Vec<PaymentMethodGroup>,
}

impl PaymentMethodCountry {
    pub fn group(&self, key: &str) -> Option<&PaymentMethodGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// All methods across groups, in document order.
    pub fn methods(&self) -> impl Iterator<Item = &PaymentMethod> {
        self.groups.iter().flat_map(|g| g.methods.iter())
    }
}

/// Payment methods available to a project in one currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodList {
    pub project_id: u64,
    pub currency: String,
    pub countries: Vec<PaymentMethodCountry>,
}

impl PaymentMethodList {
    /// An empty list for a project and currency.
    pub fn empty(project_id: u64, currency: impl Into<String>) -> Self {
        Self {
            project_id,
            currency: currency.into(),
            countries: Vec::new(),
        }
    }

    /// Country by code, case-insensitive.
    pub fn country(&self, code: &str) -> Option<&PaymentMethodCountry> {
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn country_codes(&self) -> Vec<&str> {
        self.countries.iter().map(|c| c.code.as_str()).collect()
    }
}

/// Filters for a catalog request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodOptions {
    /// Only methods accepting this amount (minor units).
    pub amount: Option<u64>,
    /// Defaults to EUR.
    pub currency: Option<String>,
    /// Preferred display language.
    pub language: Option<String>,
}

impl PaymentMethodOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Requested currency, or EUR when unset or empty.
    pub fn currency(&self) -> &str {
        self.currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn language(&self) -> &str {
        self.language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Key under which the resulting list is cached.
    pub fn cache_key(&self) -> String {
        match self.amount {
            Some(amount) => format!("{}:{}", self.currency(), amount),
            None => format!("{}:all", self.currency()),
        }
    }
}
