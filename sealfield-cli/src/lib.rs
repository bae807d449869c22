//! Operations behind the `sealfield` binary.
//!
//! Tokens are exchanged as unpadded base64url. Their plaintext is a
//! serialized [`Value`], the same payload an encrypted field stores, so a
//! token sealed here can be written straight into a BLOB column.

use anyhow::{Context, Result};
use sealfield::{open_value, seal_value};
use sealfield_crypto::{
    FieldEncryptor, KdfParams, KeyRing, KeyRingConfig, Salt, Token, derive_key,
    generate_random_key,
};
use sealfield_model::Value;
use std::time::Duration;
use tracing::debug;

/// Builds a key ring from a comma-separated key list or a JSON ring config.
pub fn load_ring(keys: &str) -> Result<KeyRing> {
    let keys = keys.trim();
    let config = if keys.starts_with('{') {
        KeyRingConfig::from_json(keys).context("Failed to parse key ring config")?
    } else {
        KeyRingConfig::from_key_list(keys)
    };
    let ring = KeyRing::from_config(&config).context("Failed to load keys")?;
    debug!(keys = ring.len(), "key ring loaded");
    Ok(ring)
}

/// A fresh random key, base64url encoded.
pub fn keygen() -> String {
    generate_random_key().to_base64()
}

/// Derives a key from `passphrase` and a base64url salt.
pub fn derive(passphrase: &str, salt: &str) -> Result<String> {
    let salt = Salt::from_base64(salt).context("Invalid salt")?;
    let key = derive_key(passphrase, &salt, &KdfParams::default())
        .context("Key derivation failed")?;
    Ok(key.to_base64())
}

/// Encrypts a JSON-encoded [`Value`] into a token.
pub fn seal(ring: &KeyRing, json: &str) -> Result<String> {
    let value: Value = serde_json::from_str(json)
        .context("Expected a value such as {\"type\":\"text\",\"value\":\"...\"}")?;
    let sealed = seal_value(ring, &value)?;
    Ok(Token::from_bytes(&sealed)?.to_base64())
}

/// Decrypts a token back to its JSON-encoded [`Value`].
///
/// With `ttl_secs`, tokens older than that are rejected regardless of the
/// ring's own TTL.
pub fn open(ring: &KeyRing, token: &str, ttl_secs: Option<u64>) -> Result<String> {
    let bytes = Token::from_base64(token)
        .context("Malformed token")?
        .to_bytes();
    let value: Value = match ttl_secs {
        Some(secs) => {
            let plaintext = ring.decrypt_with_ttl(&bytes, Duration::from_secs(secs))?;
            serde_json::from_slice(&plaintext).context("Token payload is not a value")?
        }
        None => open_value(ring, &bytes)?,
    };
    Ok(serde_json::to_string(&value)?)
}

/// Re-encrypts a token under the ring's primary key.
pub fn rotate(ring: &KeyRing, token: &str) -> Result<String> {
    let bytes = Token::from_base64(token)
        .context("Malformed token")?
        .to_bytes();
    let rotated = ring.rotate(&bytes)?;
    Ok(Token::from_bytes(&rotated)?.to_base64())
}

/// Header fields of a token; needs no key.
pub fn inspect(token: &str) -> Result<String> {
    let token = Token::from_base64(token).context("Malformed token")?;
    let issued = token
        .issued_at_utc()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| token.issued_at.to_string());
    Ok(format!(
        "issued_at: {issued}\nciphertext: {} bytes",
        token.ciphertext.len()
    ))
}
