//! Field keys and passphrase derivation.
//!
//! Keys are always supplied by the caller: either raw bytes, a base64url
//! string from configuration, or an Argon2id derivation from a passphrase.

use crate::error::{CryptoError, CryptoResult};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Size of encryption keys in bytes (256 bits for ChaCha20).
pub const KEY_SIZE: usize = 32;

/// Size of salt in bytes.
pub const SALT_SIZE: usize = 16;

/// A field encryption key, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FieldKey {
    bytes: [u8; KEY_SIZE],
}

impl FieldKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a key from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self { bytes })
    }

    /// Decodes a base64url key. Trailing `=` padding is accepted.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let mut decoded = URL_SAFE_NO_PAD
            .decode(encoded.trim().trim_end_matches('='))
            .map_err(|e| CryptoError::InvalidKey(format!("invalid base64: {e}")))?;
        let key = Self::from_slice(&decoded);
        decoded.zeroize();
        key
    }

    /// Encodes the key as unpadded base64url, the form accepted by configuration.
    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.bytes)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Salt for passphrase derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generates a random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let decoded = URL_SAFE_NO_PAD
            .decode(encoded.trim().trim_end_matches('='))
            .map_err(|e| CryptoError::KeyDerivation(format!("invalid salt encoding: {e}")))?;
        let bytes: [u8; SALT_SIZE] = decoded.as_slice().try_into().map_err(|_| {
            CryptoError::KeyDerivation(format!(
                "salt must be {SALT_SIZE} bytes, got {}",
                decoded.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }
}

/// Argon2id cost settings. Defaults to 19 MiB, two passes, one lane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub lanes: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            lanes: 1,
        }
    }
}

impl KdfParams {
    fn hasher(&self) -> CryptoResult<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.lanes, Some(KEY_SIZE))
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Stretches a passphrase into a field key.
pub fn derive_key(passphrase: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<FieldKey> {
    let mut out = Zeroizing::new([0u8; KEY_SIZE]);
    params
        .hasher()?
        .hash_password_into(passphrase.as_bytes(), salt.as_bytes(), &mut out[..])
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(FieldKey::from_bytes(*out))
}

/// Generates a random field key.
pub fn generate_random_key() -> FieldKey {
    let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
    rand::rngs::OsRng.fill_bytes(&mut bytes[..]);
    FieldKey::from_bytes(*bytes)
}
