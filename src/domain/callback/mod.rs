//! Inbound payment-status callbacks.
//!
//! # Module Structure
//!
//! - `query` - Raw callback parameters
//! - `sign_checker` - Scheme selection and signature checkers
//! - `validator` - Verification, decryption, tenant check and parsing
//! - `parsed` - [`ParsedCallback`] and reconciliation
//! - `status` - [`PaymentStatus`]
//! - `errors` - [`CallbackError`]

mod errors;
mod parsed;
mod query;
mod sign_checker;
mod status;
mod validator;

pub use errors::CallbackError;
pub use parsed::{ExpectedFields, ParsedCallback, PaymentType};
pub use query::CallbackQuery;
pub use sign_checker::{
    CallbackTransport, RsaSignChecker, SignChecker, SignatureScheme, Ss1SignChecker,
};
pub use status::PaymentStatus;
pub use validator::CallbackValidator;
