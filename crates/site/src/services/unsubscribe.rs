//! Signed newsletter unsubscribe links.
//!
//! The link carries the subscriber's email and an HMAC-SHA256 tag over it, so
//! nobody can unsubscribe an address they did not receive mail at.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use awalan_core::Email;

type HmacSha256 = Hmac<Sha256>;

/// Path of the unsubscribe endpoint.
pub const UNSUBSCRIBE_PATH: &str = "/newsletter/unsubscribe";

/// Error creating the signer.
#[derive(Debug, Error)]
#[error("invalid signing key: {0}")]
pub struct SignerError(String);

/// Signs and verifies unsubscribe tags.
#[derive(Clone)]
pub struct UnsubscribeSigner {
    mac: HmacSha256,
}

impl UnsubscribeSigner {
    /// Create a signer keyed with the site's signing secret.
    ///
    /// # Errors
    ///
    /// Returns `SignerError` if the key is rejected by the MAC.
    pub fn new(key: &SecretString) -> Result<Self, SignerError> {
        let mac = HmacSha256::new_from_slice(key.expose_secret().as_bytes())
            .map_err(|e| SignerError(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Hex-encoded tag for an email address.
    #[must_use]
    pub fn tag(&self, email: &Email) -> String {
        let mut mac = self.mac.clone();
        mac.update(email.as_str().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check a tag in constant time.
    #[must_use]
    pub fn verify(&self, email: &Email, tag: &str) -> bool {
        let Ok(bytes) = hex::decode(tag) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(email.as_str().as_bytes());
        mac.verify_slice(&bytes).is_ok()
    }

    /// Absolute unsubscribe link for `email` under `base_url`.
    #[must_use]
    pub fn link(&self, base_url: &str, email: &Email) -> String {
        format!(
            "{}{UNSUBSCRIBE_PATH}?email={}&tag={}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(email.as_str()),
            self.tag(email)
        )
    }
}
