use crate::encrypted::EncryptedField;
use sealfield_crypto::FieldEncryptor;
use sealfield_model::base;
use sealfield_model::{FieldError, FieldRegistry};
use std::sync::Arc;

/// Teaches `registry` to rebuild [`EncryptedField`]s.
///
/// Keys are never part of a deconstruction, so every rebuilt adapter gets
/// `encryptor`. The wrapped field is rebuilt through the same registry.
pub fn register_encrypted_field(registry: &mut FieldRegistry, encryptor: Arc<dyn FieldEncryptor>) {
    registry.register(EncryptedField::PATH, move |d, registry| {
        let base_field = d.field("base_field").ok_or_else(|| {
            FieldError::InvalidDeclaration(format!("{}: missing 'base_field'", d.path))
        })?;
        let wrapped = registry.reconstruct(base_field)?;
        let options = base::options_from(d)?;
        Ok(Box::new(EncryptedField::new(
            wrapped,
            Arc::clone(&encryptor),
            options,
        )))
    });
}
