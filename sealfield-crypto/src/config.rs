//! Key ring configuration.
//!
//! Key material always comes from the caller. This module only parses the
//! shapes a deployment is likely to hand over: a JSON document or a
//! comma-separated list of base64url keys in a named environment variable.

use crate::error::{CryptoError, CryptoResult};
use crate::key::FieldKey;
use serde::{Deserialize, Serialize};

/// Serializable key ring settings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct KeyRingConfig {
    /// Base64url keys, primary first.
    pub keys: Vec<String>,
    /// Maximum token age accepted on decrypt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
}

impl KeyRingConfig {
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a comma-separated key list (`"k1,k2"`); blanks are ignored.
    pub fn from_key_list(list: &str) -> Self {
        Self {
            keys: list
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
            ttl_secs: None,
        }
    }

    /// Reads the environment variable `var`.
    ///
    /// A value starting with `{` is parsed as JSON, anything else as a key list.
    pub fn from_env(var: &str) -> CryptoResult<Self> {
        let raw = std::env::var(var)
            .map_err(|_| CryptoError::MissingKeyMaterial(format!("environment variable {var}")))?;
        let raw = raw.trim();
        if raw.starts_with('{') {
            Self::from_json(raw)
        } else {
            Ok(Self::from_key_list(raw))
        }
    }

    /// Decodes every configured key.
    pub fn keys(&self) -> CryptoResult<Vec<FieldKey>> {
        self.keys.iter().map(|k| FieldKey::from_base64(k)).collect()
    }
}

impl std::fmt::Debug for KeyRingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRingConfig")
            .field("keys", &format_args!("[{} REDACTED]", self.keys.len()))
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
