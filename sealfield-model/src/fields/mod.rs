//! Built-in field types.

mod json;
mod related;
mod scalar;
mod temporal;
mod text;

pub use json::JsonField;
pub use related::{ForeignKey, OnDelete};
pub use scalar::{BooleanField, FloatField, IntegerField};
pub use temporal::{DateField, DateTimeField};
pub use text::{CharField, TextField};

use crate::error::{FieldError, ValidationError};

fn invalid(message: String) -> FieldError {
    ValidationError::new("invalid", message).into()
}
