use crate::codec;
use sealfield_crypto::FieldEncryptor;
use sealfield_model::base;
use sealfield_model::{
    Argument, CheckMessage, Connection, Deconstruction, Field, FieldError, FieldOptions,
    FieldResult, InternalType, Record, ValidationError, Value,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A field stored as ciphertext.
///
/// Type behavior (coercion, length, validators, relation flag) comes from the
/// wrapped field. The adapter only changes what crosses the storage
/// boundary: prepared values are serialized and encrypted into
/// [`Value::Bytes`], and stored bytes are decrypted and handed back to the
/// wrapped field to restore the logical type. Null is never encrypted.
pub struct EncryptedField {
    options: FieldOptions,
    wrapped: Box<dyn Field>,
    encryptor: Arc<dyn FieldEncryptor>,
}

impl EncryptedField {
    pub const PATH: &'static str = "sealfield.EncryptedField";

    pub fn new(
        wrapped: Box<dyn Field>,
        encryptor: Arc<dyn FieldEncryptor>,
        options: FieldOptions,
    ) -> Self {
        Self {
            options,
            wrapped,
            encryptor,
        }
    }

    /// Wraps `field` with default adapter options.
    pub fn wrap(field: impl Field + 'static, encryptor: Arc<dyn FieldEncryptor>) -> Self {
        Self::new(Box::new(field), encryptor, FieldOptions::default())
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    pub fn wrapped(&self) -> &dyn Field {
        self.wrapped.as_ref()
    }

    pub fn encryptor(&self) -> &Arc<dyn FieldEncryptor> {
        &self.encryptor
    }

    fn label(&self) -> &str {
        self.name().unwrap_or("<unbound>")
    }

    fn unexpected(&self, stored: &Value) -> FieldError {
        FieldError::InvalidStoredValue {
            field: self.label().to_string(),
            expected: "bytes",
            actual: stored.type_name(),
        }
    }
}

impl Field for EncryptedField {
    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    fn path(&self) -> &'static str {
        Self::PATH
    }

    fn description(&self) -> String {
        format!("Encrypted {}", self.wrapped.description())
    }

    fn internal_type(&self) -> InternalType {
        InternalType::Binary
    }

    fn is_relation(&self) -> bool {
        self.wrapped.is_relation()
    }

    fn max_length(&self) -> Option<usize> {
        self.wrapped.max_length()
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        self.wrapped.to_python(value)
    }

    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        self.wrapped.get_prep_value(value)
    }

    fn get_db_prep_value(
        &self,
        value: Value,
        connection: &Connection,
        prepared: bool,
    ) -> FieldResult<Value> {
        let value = self.wrapped.get_db_prep_value(value, connection, prepared)?;
        if value.is_null() {
            return Ok(value);
        }
        let sealed = codec::seal_value(self.encryptor.as_ref(), &value)?;
        debug!(field = self.label(), bytes = sealed.len(), "sealed field value");
        Ok(Value::Bytes(sealed))
    }

    fn from_db_value(&self, value: Value, connection: &Connection) -> FieldResult<Value> {
        let bytes = match value {
            Value::Null => return Ok(Value::Null),
            Value::Bytes(bytes) if bytes.is_empty() => return Ok(Value::Bytes(bytes)),
            Value::Bytes(bytes) => bytes,
            other => return Err(self.unexpected(&other)),
        };

        let stored = codec::open_value(self.encryptor.as_ref(), &bytes).inspect_err(|e| {
            warn!(field = self.label(), error = %e, "failed to open stored value");
        })?;
        let value = self.wrapped.from_db_value(stored, connection)?;
        self.wrapped.to_python(value)
    }

    /// Re-encrypts under the encryptor's current key; null and empty bytes pass through.
    fn rotate_stored(&self, value: Value) -> FieldResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Bytes(bytes) if bytes.is_empty() => Ok(Value::Bytes(bytes)),
            Value::Bytes(bytes) => {
                let rotated = self.encryptor.rotate(&bytes)?;
                debug!(field = self.label(), "rotated stored value");
                Ok(Value::Bytes(rotated))
            }
            other => Err(self.unexpected(&other)),
        }
    }

    fn check(&self) -> Vec<CheckMessage> {
        let mut errors = base::check(self);

        if self.wrapped.is_relation() {
            errors.push(CheckMessage::error(
                "Base field for encrypted cannot be a related field.",
                "encrypted.E002",
            ));
            return errors;
        }

        let keyed = |o: &FieldOptions| o.unique || o.primary_key;
        if keyed(&self.options) || keyed(self.wrapped.options()) {
            errors.push(
                CheckMessage::error(
                    "Encrypted fields cannot be unique or primary keys.",
                    "encrypted.E003",
                )
                .with_hint("Stored tokens use a random nonce, so equal values never compare equal."),
            );
        }

        let wrapped_errors = self.wrapped.check();
        if !wrapped_errors.is_empty() {
            let details: Vec<String> = wrapped_errors
                .iter()
                .map(|e| format!("{} ({})", e.msg, e.id))
                .collect();
            errors.push(CheckMessage::error(
                format!(
                    "Base field for encrypted has errors:\n    {}",
                    details.join("\n    ")
                ),
                "encrypted.E001",
            ));
        }
        errors
    }

    fn set_attributes_from_name(&mut self, name: &str) {
        base::set_attributes_from_name(&mut self.options, name);
        self.wrapped.set_attributes_from_name(name);
    }

    fn deconstruct(&self) -> Deconstruction {
        let mut d = base::deconstruct(self);
        d.kwargs.insert(
            "base_field".into(),
            Argument::Field(Box::new(self.wrapped.deconstruct())),
        );
        d
    }

    fn validate(&self, value: &Value, record: Option<&Record>) -> Result<(), ValidationError> {
        base::validate(&self.options, value)?;
        self.wrapped.validate(value, record)
    }

    fn run_validators(&self, value: &Value) -> Result<(), ValidationError> {
        base::run_validators(self, value)?;
        self.wrapped.run_validators(value)
    }
}

impl fmt::Debug for EncryptedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedField")
            .field("options", &self.options)
            .field("wrapped", &self.wrapped)
            .finish_non_exhaustive()
    }
}
