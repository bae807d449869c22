//! Encryption layer for sealfield.
//!
//! - [`FieldKey`]: 256-bit keys, from bytes, base64url, or Argon2id
//! - [`Token`]: ChaCha20-Poly1305 ciphertext with an authenticated header
//! - [`FieldEncryptor`]: the interface encrypted fields consume
//! - [`KeyRing`]: ordered keys with rotation and optional TTL

mod cipher;
mod config;
mod encryptor;
mod error;
mod key;

pub use cipher::{
    HEADER_SIZE, MIN_TOKEN_SIZE, NONCE_SIZE, TAG_SIZE, TOKEN_VERSION, Token, now_unix, open, seal,
    seal_at,
};
pub use config::KeyRingConfig;
pub use encryptor::{FieldEncryptor, KeyRing, MAX_CLOCK_SKEW_SECS};
pub use error::{CryptoError, CryptoResult};
pub use key::{FieldKey, KEY_SIZE, KdfParams, SALT_SIZE, Salt, derive_key, generate_random_key};
