//! Field and model contract for sealfield.
//!
//! Defines the types a persistence layer and its fields agree on:
//! - [`Field`]: coercion, validation, storage preparation, checks, deconstruction
//! - [`Value`]: the logical and stored value of a column
//! - [`ModelSchema`] / [`Record`]: a table declaration and one of its rows
//! - [`FieldRegistry`]: rebuilds fields from their [`Deconstruction`]
//! - built-in fields in [`fields`]
//!
//! Field wrappers (such as the encrypted field in the `sealfield` crate)
//! implement [`Field`] themselves and reuse the shared behavior in [`base`].

pub mod base;
mod check;
mod error;
mod field;
pub mod fields;
mod handler;
mod options;
mod record;
mod registry;
mod schema;
mod validators;
mod value;

pub use check::{CheckLevel, CheckMessage};
pub use error::{ErrorDetail, FieldError, FieldResult, ValidationError};
pub use field::{Argument, Connection, Deconstruction, Field, InternalType, Vendor};
pub use fields::{
    BooleanField, CharField, DateField, DateTimeField, FloatField, ForeignKey, IntegerField,
    JsonField, OnDelete, TextField,
};
pub use handler::ModelHooks;
pub use options::FieldOptions;
pub use record::Record;
pub use registry::{FieldConstructor, FieldRegistry};
pub use schema::ModelSchema;
pub use validators::Validator;
pub use value::Value;
