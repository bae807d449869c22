use super::invalid;
use crate::base;
use crate::error::FieldResult;
use crate::field::{Deconstruction, Field, InternalType};
use crate::options::FieldOptions;
use crate::validators::Validator;
use crate::value::Value;

/// True or false.
#[derive(Debug, Clone, Default)]
pub struct BooleanField {
    options: FieldOptions,
}

impl BooleanField {
    pub const PATH: &'static str = "sealfield_model.BooleanField";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FieldOptions) -> Self {
        Self { options }
    }

    pub fn from_deconstruction(d: &Deconstruction) -> FieldResult<Self> {
        Ok(Self::with_options(base::options_from(d)?))
    }
}

impl Field for BooleanField {
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
        "Boolean (Either True or False)".to_string()
    }

    fn internal_type(&self) -> InternalType {
        InternalType::Boolean
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        match value {
            Value::Null | Value::Bool(_) => Ok(value),
            Value::Integer(0) => Ok(Value::Bool(false)),
            Value::Integer(1) => Ok(Value::Bool(true)),
            Value::Text(ref s) => match s.as_str() {
                "t" | "True" | "true" | "1" => Ok(Value::Bool(true)),
                "f" | "False" | "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid(format!("{value} value must be either True or False."))),
            },
            other => Err(invalid(format!(
                "{other} value must be either True or False."
            ))),
        }
    }

    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        self.to_python(value)
    }
}

/// Signed integers within the 32-bit range every backend supports.
#[derive(Debug, Clone, Default)]
pub struct IntegerField {
    options: FieldOptions,
}

impl IntegerField {
    pub const PATH: &'static str = "sealfield_model.IntegerField";
    pub const MIN: i64 = i32::MIN as i64;
    pub const MAX: i64 = i32::MAX as i64;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FieldOptions) -> Self {
        Self { options }
    }

    pub fn from_deconstruction(d: &Deconstruction) -> FieldResult<Self> {
        Ok(Self::with_options(base::options_from(d)?))
    }
}

/// Integer coercion shared with relation fields.
pub(crate) fn coerce_integer(value: Value) -> FieldResult<Value> {
    match value {
        Value::Null | Value::Integer(_) => Ok(value),
        Value::Bool(b) => Ok(Value::Integer(i64::from(b))),
        Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(Value::Integer(f as i64))
        }
        Value::Text(ref s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| invalid(format!("{value} value must be an integer."))),
        other => Err(invalid(format!("{other} value must be an integer."))),
    }
}

impl Field for IntegerField {
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
        "Integer".to_string()
    }

    fn internal_type(&self) -> InternalType {
        InternalType::Integer
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        coerce_integer(value)
    }

    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        self.to_python(value)
    }

    fn default_validators(&self) -> Vec<Validator> {
        vec![
            Validator::MinValue(Self::MIN as f64),
            Validator::MaxValue(Self::MAX as f64),
        ]
    }
}

/// Double-precision floating point.
#[derive(Debug, Clone, Default)]
pub struct FloatField {
    options: FieldOptions,
}

impl FloatField {
    pub const PATH: &'static str = "sealfield_model.FloatField";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FieldOptions) -> Self {
        Self { options }
    }

    pub fn from_deconstruction(d: &Deconstruction) -> FieldResult<Self> {
        Ok(Self::with_options(base::options_from(d)?))
    }
}

impl Field for FloatField {
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
        "Floating point number".to_string()
    }

    fn internal_type(&self) -> InternalType {
        InternalType::Float
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        // Infinity and NaN have no JSON form and cannot be stored.
        match value {
            Value::Null => Ok(value),
            Value::Float(f) if f.is_finite() => Ok(value),
            Value::Integer(i) => Ok(Value::Float(i as f64)),
            Value::Text(ref s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float)
                .ok_or_else(|| invalid(format!("{value} value must be a finite float."))),
            other => Err(invalid(format!("{other} value must be a finite float."))),
        }
    }

    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        self.to_python(value)
    }
}
