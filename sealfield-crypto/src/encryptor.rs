//! Abstract encryption interface for encrypted fields.
//!
//! Field adapters depend on `Arc<dyn FieldEncryptor>` and never see raw keys.
//! [`KeyRing`] is the standard implementation: the first key seals, every key
//! may open, which lets old rows stay readable across a key rotation.

use crate::cipher::{self, Token, now_unix};
use crate::config::KeyRingConfig;
use crate::error::{CryptoError, CryptoResult};
use crate::key::FieldKey;
use std::time::Duration;
use tracing::debug;

/// Tokens stamped further than this into the future are rejected.
pub const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// Symmetric encryption of opaque byte slices.
///
/// Implementations own the key material and must be reentrant.
pub trait FieldEncryptor: Send + Sync {
    /// Encrypt `plaintext`, returning an opaque authenticated blob.
    fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Decrypt a blob previously produced by `encrypt`.
    fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Re-encrypt a blob under the current primary key.
    ///
    /// Encryptors without key rotation decrypt and encrypt again.
    fn rotate(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        let plaintext = self.decrypt(ciphertext)?;
        self.encrypt(&plaintext)
    }
}

/// An ordered set of field keys. The first key is the primary.
pub struct KeyRing {
    keys: Vec<FieldKey>,
    ttl: Option<Duration>,
}

impl KeyRing {
    /// Builds a ring from keys in priority order.
    pub fn new(keys: Vec<FieldKey>) -> CryptoResult<Self> {
        if keys.is_empty() {
            return Err(CryptoError::NoKeys);
        }
        Ok(Self { keys, ttl: None })
    }

    /// A ring with one key.
    pub fn single(key: FieldKey) -> Self {
        Self {
            keys: vec![key],
            ttl: None,
        }
    }

    /// Enforces `ttl` on every [`FieldEncryptor::decrypt`] call.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn from_config(config: &KeyRingConfig) -> CryptoResult<Self> {
        let ring = Self::new(config.keys()?)?;
        Ok(match config.ttl_secs {
            Some(secs) => ring.with_ttl(Duration::from_secs(secs)),
            None => ring,
        })
    }

    /// Builds a ring from the environment variable `var`.
    ///
    /// See [`KeyRingConfig::from_env`] for the accepted formats.
    pub fn from_env(var: &str) -> CryptoResult<Self> {
        Self::from_config(&KeyRingConfig::from_env(var)?)
    }

    pub fn primary(&self) -> &FieldKey {
        &self.keys[0]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Seals with the primary key and an explicit issue time.
    pub fn encrypt_at(&self, plaintext: &[u8], issued_at: u64) -> CryptoResult<Vec<u8>> {
        Ok(cipher::seal_at(self.primary(), plaintext, issued_at)?.to_bytes())
    }

    /// Decrypts and additionally rejects tokens older than `ttl`.
    pub fn decrypt_with_ttl(&self, ciphertext: &[u8], ttl: Duration) -> CryptoResult<Vec<u8>> {
        self.decrypt_checked(ciphertext, Some(ttl), now_unix())
    }

    fn decrypt_checked(
        &self,
        ciphertext: &[u8],
        ttl: Option<Duration>,
        now: u64,
    ) -> CryptoResult<Vec<u8>> {
        let token = Token::from_bytes(ciphertext)?;
        let plaintext = self.open_any(&token)?;

        if token.issued_at > now.saturating_add(MAX_CLOCK_SKEW_SECS) {
            return Err(CryptoError::InvalidToken(
                "token timestamp is in the future".to_string(),
            ));
        }
        if let Some(ttl) = ttl {
            let age_secs = now.saturating_sub(token.issued_at);
            if age_secs > ttl.as_secs() {
                return Err(CryptoError::Expired {
                    age_secs,
                    ttl_secs: ttl.as_secs(),
                });
            }
        }
        Ok(plaintext)
    }

    fn open_any(&self, token: &Token) -> CryptoResult<Vec<u8>> {
        for (index, key) in self.keys.iter().enumerate() {
            if let Ok(plaintext) = cipher::open(key, token) {
                debug!(key_index = index, "token opened");
                return Ok(plaintext);
            }
        }
        Err(CryptoError::Decryption(format!(
            "no key in ring of {} could authenticate token",
            self.keys.len()
        )))
    }
}

impl FieldEncryptor for KeyRing {
    fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        Ok(cipher::seal(self.primary(), plaintext)?.to_bytes())
    }

    fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        self.decrypt_checked(ciphertext, self.ttl, now_unix())
    }

    fn rotate(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        // TTL is not applied on rotation.
        let plaintext = self.decrypt_checked(ciphertext, None, now_unix())?;
        self.encrypt(&plaintext)
    }
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRing")
            .field("keys", &self.keys.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
