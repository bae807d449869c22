use crate::error::ValidationError;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Declarative value validators.
///
/// Length validators apply to text (characters) and bytes; value validators
/// apply to integers and floats. Other variants pass untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "limit", rename_all = "snake_case")]
pub enum Validator {
    MinLength(usize),
    MaxLength(usize),
    MinValue(f64),
    MaxValue(f64),
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Text(s) => Some(s.chars().count()),
        Value::Bytes(b) => Some(b.len()),
        _ => None,
    }
}

impl Validator {
    pub fn code(&self) -> &'static str {
        match self {
            Validator::MinLength(_) => "min_length",
            Validator::MaxLength(_) => "max_length",
            Validator::MinValue(_) => "min_value",
            Validator::MaxValue(_) => "max_value",
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let failure = match *self {
            Validator::MinLength(limit) => length_of(value)
                .filter(|&len| len < limit)
                .map(|len| {
                    format!("Ensure this value has at least {limit} characters (it has {len}).")
                }),
            Validator::MaxLength(limit) => length_of(value)
                .filter(|&len| len > limit)
                .map(|len| {
                    format!("Ensure this value has at most {limit} characters (it has {len}).")
                }),
            Validator::MinValue(limit) => value
                .as_f64()
                .filter(|&v| v < limit)
                .map(|_| format!("Ensure this value is greater than or equal to {limit}.")),
            Validator::MaxValue(limit) => value
                .as_f64()
                .filter(|&v| v > limit)
                .map(|_| format!("Ensure this value is less than or equal to {limit}.")),
        };
        match failure {
            Some(message) => Err(ValidationError::new(self.code(), message)),
            None => Ok(()),
        }
    }
}
