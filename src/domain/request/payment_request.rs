//! Typed payment request parameters.

use serde::{Deserialize, Serialize};

use super::params::RequestParams;

/// Parameters of a payment request, before the project id and protocol
/// version are added.
///
/// Only the order id and the three redirect/callback URLs are required; every
/// other field is omitted from the request when `None`.
///
/// # Example
///
/// ```
/// use webtopay::domain::request::PaymentRequest;
///
/// let request = PaymentRequest::new(
///     "ORD-1",
///     "https://shop.example/ok",
///     "https://shop.example/cancel",
///     "https://shop.example/callback",
/// )
/// .with_amount(1000)
/// .with_currency("EUR");
///
/// assert_eq!(request.to_params().get("amount"), Some("1000"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub orderid: String,
    pub accepturl: String,
    pub cancelurl: String,
    pub callbackurl: String,

    /// Amount in minor units (cents).
    pub amount: Option<u64>,
    pub currency: Option<String>,
    /// Preselected payment method key.
    pub payment: Option<String>,
    pub country: Option<String>,
    pub paytext: Option<String>,
    pub lang: Option<String>,
    pub test: Option<bool>,
    pub time_limit: Option<String>,
    pub only_payments: Option<String>,
    pub disallow_payments: Option<String>,
    pub buyer_consent: Option<bool>,
    pub personcode: Option<String>,
    pub developerid: Option<u64>,

    pub p_firstname: Option<String>,
    pub p_lastname: Option<String>,
    pub p_email: Option<String>,
    pub p_street: Option<String>,
    pub p_city: Option<String>,
    pub p_state: Option<String>,
    pub p_zip: Option<String>,
    pub p_countrycode: Option<String>,

    pub repeat_request: Option<bool>,

    /// Additional fields appended after the known ones.
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl PaymentRequest {
    /// Creates a request with the required fields.
    pub fn new(
        order_id: impl Into<String>,
        accept_url: impl Into<String>,
        cancel_url: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            orderid: order_id.into(),
            accepturl: accept_url.into(),
            cancelurl: cancel_url.into(),
            callbackurl: callback_url.into(),
            ..Default::default()
        }
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_payment(mut self, payment: impl Into<String>) -> Self {
        self.payment = Some(payment.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_paytext(mut self, paytext: impl Into<String>) -> Self {
        self.paytext = Some(paytext.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Marks the request as a test payment.
    pub fn with_test(mut self, test: bool) -> Self {
        self.test = Some(test);
        self
    }

    pub fn with_time_limit(mut self, time_limit: impl Into<String>) -> Self {
        self.time_limit = Some(time_limit.into());
        self
    }

    pub fn with_only_payments(mut self, methods: impl Into<String>) -> Self {
        self.only_payments = Some(methods.into());
        self
    }

    pub fn with_disallow_payments(mut self, methods: impl Into<String>) -> Self {
        self.disallow_payments = Some(methods.into());
        self
    }

    pub fn with_buyer_consent(mut self, consent: bool) -> Self {
        self.buyer_consent = Some(consent);
        self
    }

    pub fn with_personcode(mut self, personcode: impl Into<String>) -> Self {
        self.personcode = Some(personcode.into());
        self
    }

    pub fn with_developer_id(mut self, developer_id: u64) -> Self {
        self.developerid = Some(developer_id);
        self
    }

    /// Sets the payer's first and last name.
    pub fn with_payer_name(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.p_firstname = Some(first_name.into());
        self.p_lastname = Some(last_name.into());
        self
    }

    pub fn with_payer_email(mut self, email: impl Into<String>) -> Self {
        self.p_email = Some(email.into());
        self
    }

    /// Sets the payer's postal address.
    pub fn with_payer_address(
        mut self,
        street: impl Into<String>,
        city: impl Into<String>,
        state: Option<String>,
        zip: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        self.p_street = Some(street.into());
        self.p_city = Some(city.into());
        self.p_state = state;
        self.p_zip = Some(zip.into());
        self.p_countrycode = Some(country_code.into());
        self
    }

    /// Adds a field the typed struct does not know about.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Flattens the request into wire fields, in declaration order.
    pub fn to_params(&self) -> RequestParams {
        let mut params = RequestParams::new();
        params.set("orderid", self.orderid.as_str());
        params.set("accepturl", self.accepturl.as_str());
        params.set("cancelurl", self.cancelurl.as_str());
        params.set("callbackurl", self.callbackurl.as_str());

        let optional = [
            ("amount", self.amount.map(|v| v.to_string())),
            ("currency", self.currency.clone()),
            ("payment", self.payment.clone()),
            ("country", self.country.clone()),
            ("paytext", self.paytext.clone()),
            ("lang", self.lang.clone()),
            ("test", self.test.map(flag)),
            ("time_limit", self.time_limit.clone()),
            ("only_payments", self.only_payments.clone()),
            ("disallow_payments", self.disallow_payments.clone()),
            ("buyer_consent", self.buyer_consent.map(flag)),
            ("personcode", self.personcode.clone()),
            ("developerid", self.developerid.map(|v| v.to_string())),
            ("p_firstname", self.p_firstname.clone()),
            ("p_lastname", self.p_lastname.clone()),
            ("p_email", self.p_email.clone()),
            ("p_street", self.p_street.clone()),
            ("p_city", self.p_city.clone()),
            ("p_state", self.p_state.clone()),
            ("p_zip", self.p_zip.clone()),
            ("p_countrycode", self.p_countrycode.clone()),
            ("repeat_request", self.repeat_request.map(flag)),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.set(key, value);
            }
        }

        for (key, value) in &self.extra {
            params.set(key.as_str(), value.as_str());
        }
        params
    }
}

fn flag(value: bool) -> String {
    let flag = if value { "1" } else { "0" };
    flag.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest::new(
            "ORD-1",
            "https://example.com/ok",
            "https://example.com/cancel",
            "https://example.com/cb",
        )
    }

    #[test]
    fn required_fields_come_first() {
        let params = request().with_amount(1000).to_params();
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["orderid", "accepturl", "cancelurl", "callbackurl", "amount"]
        );
    }

    #[test]
    fn none_fields_are_omitted() {
        let params = request().to_params();
        assert_eq!(params.len(), 4);
        assert_eq!(params.get("currency"), None);
    }

    #[test]
    fn booleans_become_binary_flags() {
        let params = request().with_test(true).with_buyer_consent(false).to_params();
        assert_eq!(params.get("test"), Some("1"));
        assert_eq!(params.get("buyer_consent"), Some("0"));
    }

    #[test]
    fn payer_details_are_flattened() {
        let params = request()
            .with_payer_name("Jonas", "Jonaitis")
            .with_payer_email("jonas@test.lt")
            .with_payer_address("Gedimino pr. 1", "Vilnius", None, "01103", "LT")
            .to_params();

        assert_eq!(params.get("p_firstname"), Some("Jonas"));
        assert_eq!(params.get("p_lastname"), Some("Jonaitis"));
        assert_eq!(params.get("p_email"), Some("jonas@test.lt"));
        assert_eq!(params.get("p_city"), Some("Vilnius"));
        assert_eq!(params.get("p_state"), None);
        assert_eq!(params.get("p_countrycode"), Some("LT"));
    }

    #[test]
    fn extra_params_are_appended() {
        let params = request()
            .with_currency("EUR")
            .with_param("custom", "value")
            .to_params();
        let last = params.iter().last().unwrap();
        assert_eq!(last, ("custom", "value"));
    }
}
