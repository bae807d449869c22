//! Error types for the field layer.

use sealfield_crypto::CryptoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// One validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Field the failure belongs to, set by model-level validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Machine-readable code (`null`, `blank`, `max_length`, ...).
    pub code: String,
    pub message: String,
}

/// A plaintext value failed type, range, or format rules.
///
/// Holds every failure collected by the validator pass, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub details: Vec<ErrorDetail>,
}

impl ValidationError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            details: vec![ErrorDetail {
                field: None,
                code: code.into(),
                message: message.into(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn extend(&mut self, other: ValidationError) {
        self.details.extend(other.details);
    }

    /// Attributes every detail without a field to `field`.
    pub fn for_field(mut self, field: &str) -> Self {
        for detail in &mut self.details {
            detail.field.get_or_insert_with(|| field.to_string());
        }
        self
    }

    pub fn codes(&self) -> Vec<&str> {
        self.details.iter().map(|d| d.code.as_str()).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.details.iter().map(|d| d.message.as_str()).collect()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, detail) in self.details.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match &detail.field {
                Some(field) => write!(f, "{field}: {}", detail.message)?,
                None => f.write_str(&detail.message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised on the data path of a field.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The value failed validation or could not be coerced.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage handed back a value of the wrong shape for this field.
    #[error("unexpected stored value for {field}: expected {expected}, got {actual}")]
    InvalidStoredValue {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// No constructor is registered for a deconstructed path.
    #[error("unknown field path: {0}")]
    UnknownField(String),

    /// A deconstruction is missing or has malformed arguments.
    #[error("invalid field declaration: {0}")]
    InvalidDeclaration(String),

    /// Encryption or decryption failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A serialized payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
