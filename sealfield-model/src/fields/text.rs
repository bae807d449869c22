use super::invalid;
use crate::base;
use crate::check::CheckMessage;
use crate::error::FieldResult;
use crate::field::{Argument, Deconstruction, Field, InternalType};
use crate::options::FieldOptions;
use crate::validators::Validator;
use crate::value::Value;

fn coerce_text(value: Value) -> FieldResult<Value> {
    match value {
        Value::Null | Value::Text(_) => Ok(value),
        Value::Bool(b) => Ok(Value::Text(b.to_string())),
        Value::Integer(i) => Ok(Value::Text(i.to_string())),
        Value::Float(f) => Ok(Value::Text(f.to_string())),
        Value::Date(d) => Ok(Value::Text(d.to_string())),
        Value::DateTime(dt) => Ok(Value::Text(dt.to_rfc3339())),
        other => Err(invalid(format!("{other} value must be text."))),
    }
}

/// Bounded string. `max_length` is required.
#[derive(Debug, Clone, Default)]
pub struct CharField {
    options: FieldOptions,
    max_length: Option<usize>,
}

impl CharField {
    pub const PATH: &'static str = "sealfield_model.CharField";

    pub fn new(max_length: usize) -> Self {
        Self {
            options: FieldOptions::default(),
            max_length: Some(max_length),
        }
    }

    /// A char field with no length bound; fails its configuration check.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_deconstruction(d: &Deconstruction) -> FieldResult<Self> {
        Ok(Self {
            options: base::options_from(d)?,
            max_length: d.usize_arg("max_length")?,
        })
    }
}

impl Field for CharField {
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
        match self.max_length {
            Some(n) => format!("String (up to {n})"),
            None => "String (unlimited)".to_string(),
        }
    }

    fn internal_type(&self) -> InternalType {
        InternalType::Char
    }

    fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        coerce_text(value)
    }

    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        self.to_python(value)
    }

    fn check(&self) -> Vec<CheckMessage> {
        let mut errors = base::check(self);
        match self.max_length {
            None => errors.push(CheckMessage::error(
                "CharFields must define a 'max_length' attribute.",
                "fields.E120",
            )),
            Some(0) => errors.push(CheckMessage::error(
                "'max_length' must be a positive integer.",
                "fields.E121",
            )),
            Some(_) => {}
        }
        errors
    }

    fn deconstruct(&self) -> Deconstruction {
        let mut d = base::deconstruct(self);
        if let Some(n) = self.max_length {
            d.kwargs.insert(
                "max_length".into(),
                Argument::Value(Value::Integer(n as i64)),
            );
        }
        d
    }

    fn default_validators(&self) -> Vec<Validator> {
        self.max_length.map(Validator::MaxLength).into_iter().collect()
    }
}

/// Unbounded text.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    options: FieldOptions,
}

impl TextField {
    pub const PATH: &'static str = "sealfield_model.TextField";

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

impl Field for TextField {
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
        "Text".to_string()
    }

    fn internal_type(&self) -> InternalType {
        InternalType::Text
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        coerce_text(value)
    }

    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        self.to_python(value)
    }
}
