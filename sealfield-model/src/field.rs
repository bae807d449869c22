//! The field contract.
//!
//! A [`Field`] describes one column of a model: how a logical [`Value`] is
//! coerced, validated, prepared for a database, and read back. Default method
//! bodies delegate to the shared behavior in [`crate::base`]; concrete fields
//! override only what their type changes.

use crate::base;
use crate::check::CheckMessage;
use crate::error::{FieldResult, ValidationError};
use crate::options::FieldOptions;
use crate::record::Record;
use crate::validators::Validator;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Storage type a field asks the persistence layer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalType {
    Boolean,
    Integer,
    Float,
    Char,
    Text,
    Date,
    DateTime,
    Json,
    Binary,
    ForeignKey,
}

impl InternalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternalType::Boolean => "BooleanField",
            InternalType::Integer => "IntegerField",
            InternalType::Float => "FloatField",
            InternalType::Char => "CharField",
            InternalType::Text => "TextField",
            InternalType::Date => "DateField",
            InternalType::DateTime => "DateTimeField",
            InternalType::Json => "JSONField",
            InternalType::Binary => "BinaryField",
            InternalType::ForeignKey => "ForeignKey",
        }
    }
}

impl fmt::Display for InternalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database backend a value is being prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    Sqlite,
    Postgresql,
    Mysql,
}

/// Per-call database context passed through the data path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub vendor: Vendor,
}

impl Connection {
    pub fn new(vendor: Vendor) -> Self {
        Self { vendor }
    }

    pub fn sqlite() -> Self {
        Self::new(Vendor::Sqlite)
    }

    pub fn postgresql() -> Self {
        Self::new(Vendor::Postgresql)
    }

    /// Backends without native date/time columns get ISO-8601 text.
    pub fn stores_temporal_as_text(&self) -> bool {
        matches!(self.vendor, Vendor::Sqlite | Vendor::Mysql)
    }

    /// Backends without a native JSON column get serialized text.
    pub fn stores_json_as_text(&self) -> bool {
        matches!(self.vendor, Vendor::Sqlite)
    }
}

/// One argument in a field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Argument {
    Value(Value),
    Choices(Vec<(Value, String)>),
    Validators(Vec<Validator>),
    Field(Box<Deconstruction>),
}

/// A field declaration in a form that can be stored and replayed.
///
/// Feeding it to [`FieldRegistry::reconstruct`](crate::FieldRegistry::reconstruct)
/// yields an equivalent field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deconstruction {
    pub name: Option<String>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
    #[serde(default)]
    pub kwargs: BTreeMap<String, Argument>,
}

impl Deconstruction {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.kwargs.get(key) {
            Some(Argument::Value(v)) => Some(v),
            _ => None,
        }
    }

    pub fn field(&self, key: &str) -> Option<&Deconstruction> {
        match self.kwargs.get(key) {
            Some(Argument::Field(d)) => Some(d),
            _ => None,
        }
    }

    pub fn require_text(&self, key: &str) -> FieldResult<&str> {
        self.value(key).and_then(Value::as_str).ok_or_else(|| {
            crate::FieldError::InvalidDeclaration(format!(
                "{}: missing text argument '{key}'",
                self.path
            ))
        })
    }

    /// An optional non-negative integer argument.
    pub fn usize_arg(&self, key: &str) -> FieldResult<Option<usize>> {
        match self.value(key) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .and_then(|i| usize::try_from(i).ok())
                .map(Some)
                .ok_or_else(|| {
                    crate::FieldError::InvalidDeclaration(format!(
                        "{}: '{key}' must be a non-negative integer, got {v}",
                        self.path
                    ))
                }),
        }
    }
}

/// A model field.
///
/// Implementations must be cheap to call repeatedly and free of interior
/// mutability: the only mutation after construction is name binding.
pub trait Field: Send + Sync + fmt::Debug {
    fn options(&self) -> &FieldOptions;

    fn options_mut(&mut self) -> &mut FieldOptions;

    /// Stable import path used in deconstruction, e.g. `sealfield_model.CharField`.
    fn path(&self) -> &'static str;

    fn description(&self) -> String;

    fn internal_type(&self) -> InternalType;

    /// Whether the field joins to another model.
    fn is_relation(&self) -> bool {
        false
    }

    fn max_length(&self) -> Option<usize> {
        None
    }

    fn name(&self) -> Option<&str> {
        self.options().name.as_deref()
    }

    fn column(&self) -> Option<&str> {
        self.options().column.as_deref()
    }

    /// Coerces an incoming value to this field's logical type.
    fn to_python(&self, value: Value) -> FieldResult<Value> {
        Ok(value)
    }

    /// Backend-independent preparation for a query parameter.
    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        Ok(value)
    }

    /// Backend-specific preparation for storage.
    fn get_db_prep_value(
        &self,
        value: Value,
        connection: &Connection,
        prepared: bool,
    ) -> FieldResult<Value> {
        let _ = connection;
        if prepared {
            Ok(value)
        } else {
            self.get_prep_value(value)
        }
    }

    /// Converts a value read from the database into the logical value.
    fn from_db_value(&self, value: Value, connection: &Connection) -> FieldResult<Value> {
        let _ = connection;
        Ok(value)
    }

    /// Re-encodes a stored value under current key material.
    ///
    /// Fields that store plaintext return the value unchanged.
    fn rotate_stored(&self, value: Value) -> FieldResult<Value> {
        Ok(value)
    }

    /// Configuration diagnostics, collected at schema-check time.
    fn check(&self) -> Vec<CheckMessage> {
        base::check(self)
    }

    fn set_attributes_from_name(&mut self, name: &str) {
        base::set_attributes_from_name(self.options_mut(), name);
    }

    fn deconstruct(&self) -> Deconstruction {
        base::deconstruct(self)
    }

    /// Validators implied by the field type itself (e.g. a length limit).
    fn default_validators(&self) -> Vec<Validator> {
        Vec::new()
    }

    /// Validates a logical value against choices, null and blank rules.
    fn validate(&self, value: &Value, record: Option<&Record>) -> Result<(), ValidationError> {
        let _ = record;
        base::validate(self.options(), value)
    }

    /// Runs default and declared validators, collecting every failure.
    fn run_validators(&self, value: &Value) -> Result<(), ValidationError> {
        base::run_validators(self, value)
    }

    /// Coerces, validates and runs validators, returning the clean value.
    fn clean(&self, value: Value, record: Option<&Record>) -> FieldResult<Value> {
        let value = self.to_python(value)?;
        self.validate(&value, record)?;
        self.run_validators(&value)?;
        Ok(value)
    }
}
