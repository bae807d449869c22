//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Key material could not be decoded.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The token is structurally malformed (truncated, unknown version, bad timestamp).
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The token authenticated but is older than the allowed TTL.
    #[error("token expired: issued {age_secs}s ago, ttl is {ttl_secs}s")]
    Expired { age_secs: u64, ttl_secs: u64 },

    /// A key ring was built without any keys.
    #[error("key ring must contain at least one key")]
    NoKeys,

    /// The configured key source is absent.
    #[error("missing key material: {0}")]
    MissingKeyMaterial(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
