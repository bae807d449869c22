//! Value payload: serde_json bytes, sealed by a [`FieldEncryptor`].

use sealfield_crypto::FieldEncryptor;
use sealfield_model::{FieldResult, ValidationError, Value};

/// Serializes `value` and encrypts the bytes.
///
/// Non-finite floats are refused: serde_json writes them as `null`, which
/// would seal a payload that can never be opened again.
pub fn seal_value(encryptor: &dyn FieldEncryptor, value: &Value) -> FieldResult<Vec<u8>> {
    if matches!(value, Value::Float(f) if !f.is_finite()) {
        let message = format!("{value} value must be a finite float.");
        return Err(ValidationError::new("invalid", message).into());
    }
    let plaintext = serde_json::to_vec(value)?;
    Ok(encryptor.encrypt(&plaintext)?)
}

/// Decrypts `ciphertext` and deserializes the payload.
pub fn open_value(encryptor: &dyn FieldEncryptor, ciphertext: &[u8]) -> FieldResult<Value> {
    let plaintext = encryptor.decrypt(ciphertext)?;
    Ok(serde_json::from_slice(&plaintext)?)
}
