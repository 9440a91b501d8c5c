//! Digest, signature and decryption primitives.
//!
//! None of these functions fail loudly: malformed keys, signatures or
//! ciphertexts degrade to `false` or `None`. Callers decide how to report.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use md5::{Digest, Md5};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;

use super::encoding::decode_safe_url_base64_bytes;

/// AES-GCM nonce length in bytes.
pub const GCM_NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const GCM_TAG_LEN: usize = 16;

/// Digest used with an RSA PKCS#1 v1.5 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// Legacy SHA-1 digest (`ss2`).
    Sha1,
    /// SHA-256 digest (`ss3`).
    Sha256,
}

/// Lowercase hex MD5 of `data || secret`.
pub fn md5_hex(data: &str, secret: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(data.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verifies a base64 RSA signature over `data` with a PEM public key.
///
/// Accepts SPKI (`BEGIN PUBLIC KEY`) and PKCS#1 (`BEGIN RSA PUBLIC KEY`)
/// keys. The signature may use either the standard or the URL-safe base64
/// alphabet.
pub fn verify_rsa_signature(
    data: &[u8],
    signature_b64: &str,
    public_key_pem: &str,
    algorithm: SignatureAlgorithm,
) -> bool {
    let Some(public_key) = parse_public_key(public_key_pem) else {
        return false;
    };
    let Ok(signature) = decode_safe_url_base64_bytes(signature_b64) else {
        return false;
    };
    if signature.is_empty() {
        return false;
    }

    let verified = match algorithm {
        SignatureAlgorithm::Sha1 => public_key.verify(
            Pkcs1v15Sign::new::<Sha1>(),
            &Sha1::digest(data),
            &signature,
        ),
        SignatureAlgorithm::Sha256 => public_key.verify(
            Pkcs1v15Sign::new::<Sha256>(),
            &Sha256::digest(data),
            &signature,
        ),
    };
    verified.is_ok()
}

fn parse_public_key(pem: &str) -> Option<RsaPublicKey> {
    let pem = pem.trim();
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .ok()
}

/// Decrypts a `nonce || ciphertext || tag` blob with AES-256-GCM.
///
/// The key is the SHA-256 digest of `password`. Returns `None` when the blob
/// is too short, authentication fails, or the plaintext is not UTF-8.
pub fn decrypt_aes_gcm(blob: &[u8], password: &str) -> Option<String> {
    if blob.len() < GCM_NONCE_LEN + GCM_TAG_LEN {
        return None;
    }

    let key = Sha256::digest(password.as_bytes());
    let cipher = Aes256Gcm::new_from_slice(&key).ok()?;

    // aes-gcm expects the tag appended to the ciphertext, which is the wire layout.
    let (nonce, sealed) = blob.split_at(GCM_NONCE_LEN);
    let plaintext = cipher.decrypt(Nonce::from_slice(nonce), sealed).ok()?;

    String::from_utf8(plaintext).ok()
}
