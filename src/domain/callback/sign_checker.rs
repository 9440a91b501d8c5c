//! Callback signature checkers and scheme selection.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::domain::foundation::{md5_hex, verify_rsa_signature, SignatureAlgorithm};

use super::query::CallbackQuery;

/// Verifies the integrity of a callback's raw `data`.
///
/// Implementations fail closed: a missing or malformed signature is `false`.
pub trait SignChecker: Send + Sync {
    fn check_sign(&self, query: &CallbackQuery) -> bool;
}

/// Signature scheme of a signed callback, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// RSA PKCS#1 v1.5 with SHA-256.
    Ss3,
    /// RSA PKCS#1 v1.5 with SHA-1.
    Ss2,
    /// MD5 keyed hash with the project password.
    Ss1,
}

impl SignatureScheme {
    /// True for the schemes verified against the provider's public key.
    pub fn requires_public_key(&self) -> bool {
        matches!(self, SignatureScheme::Ss3 | SignatureScheme::Ss2)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureScheme::Ss3 => "ss3",
            SignatureScheme::Ss2 => "ss2",
            SignatureScheme::Ss1 => "ss1",
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a callback's integrity is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackTransport {
    /// Plain encoded payload plus a signature.
    Signed(SignatureScheme),
    /// AES-256-GCM payload authenticated by its tag.
    Encrypted,
}

impl CallbackTransport {
    /// Picks the transport from the signature fields present.
    ///
    /// `ss3` wins over `ss2`, which wins over `ss1`; with none present the
    /// payload is treated as encrypted. Only the winning signature is ever
    /// checked.
    pub fn select(query: &CallbackQuery) -> Self {
        if query.ss3().is_some() {
            CallbackTransport::Signed(SignatureScheme::Ss3)
        } else if query.ss2().is_some() {
            CallbackTransport::Signed(SignatureScheme::Ss2)
        } else if query.ss1().is_some() {
            CallbackTransport::Signed(SignatureScheme::Ss1)
        } else {
            CallbackTransport::Encrypted
        }
    }

    pub fn requires_public_key(&self) -> bool {
        match self {
            CallbackTransport::Signed(scheme) => scheme.requires_public_key(),
            CallbackTransport::Encrypted => false,
        }
    }
}

impl fmt::Display for CallbackTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackTransport::Signed(scheme) => write!(f, "signed/{}", scheme),
            CallbackTransport::Encrypted => write!(f, "encrypted"),
        }
    }
}

/// Checks `ss1 == md5_hex(data || password)`.
pub struct Ss1SignChecker {
    password: SecretString,
}

impl Ss1SignChecker {
    pub fn new(password: SecretString) -> Self {
        Self { password }
    }
}

impl SignChecker for Ss1SignChecker {
    fn check_sign(&self, query: &CallbackQuery) -> bool {
        let Some(signature) = query.ss1() else {
            return false;
        };
        let computed = md5_hex(&query.data, self.password.expose_secret());
        computed.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}

impl fmt::Debug for Ss1SignChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ss1SignChecker")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Verifies `ss2` or `ss3` against the provider's RSA public key.
#[derive(Debug, Clone)]
pub struct RsaSignChecker {
    public_key_pem: String,
    scheme: SignatureScheme,
}

impl RsaSignChecker {
    /// SHA-1 checker reading `ss2`.
    pub fn ss2(public_key_pem: impl Into<String>) -> Self {
        Self {
            public_key_pem: public_key_pem.into(),
            scheme: SignatureScheme::Ss2,
        }
    }

    /// SHA-256 checker reading `ss3`.
    pub fn ss3(public_key_pem: impl Into<String>) -> Self {
        Self {
            public_key_pem: public_key_pem.into(),
            scheme: SignatureScheme::Ss3,
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }
}

impl SignChecker for RsaSignChecker {
    fn check_sign(&self, query: &CallbackQuery) -> bool {
        let (signature, algorithm) = match self.scheme {
            SignatureScheme::Ss3 => (query.ss3(), SignatureAlgorithm::Sha256),
            SignatureScheme::Ss2 => (query.ss2(), SignatureAlgorithm::Sha1),
            SignatureScheme::Ss1 => return false,
        };
        match signature {
            Some(signature) => verify_rsa_signature(
                query.data.as_bytes(),
                signature,
                &self.public_key_pem,
                algorithm,
            ),
            None => false,
        }
    }
}
