//! Payment method catalog.

mod payment_method;

pub use payment_method::{
    LocalizedText, PaymentMethod, PaymentMethodCountry, PaymentMethodGroup, PaymentMethodList,
    PaymentMethodOptions, DEFAULT_CURRENCY, DEFAULT_LANGUAGE,
};
