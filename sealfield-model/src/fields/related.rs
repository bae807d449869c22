use super::scalar::coerce_integer;
use crate::base;
use crate::check::CheckMessage;
use crate::error::{FieldError, FieldResult};
use crate::field::{Argument, Deconstruction, Field, InternalType};
use crate::options::FieldOptions;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// What happens to referencing rows when the target row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    Protect,
    Restrict,
    SetNull,
    SetDefault,
    DoNothing,
}

impl OnDelete {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::Protect => "PROTECT",
            OnDelete::Restrict => "RESTRICT",
            OnDelete::SetNull => "SET_NULL",
            OnDelete::SetDefault => "SET_DEFAULT",
            OnDelete::DoNothing => "DO_NOTHING",
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnDelete {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASCADE" => Ok(OnDelete::Cascade),
            "PROTECT" => Ok(OnDelete::Protect),
            "RESTRICT" => Ok(OnDelete::Restrict),
            "SET_NULL" => Ok(OnDelete::SetNull),
            "SET_DEFAULT" => Ok(OnDelete::SetDefault),
            "DO_NOTHING" => Ok(OnDelete::DoNothing),
            other => Err(FieldError::InvalidDeclaration(format!(
                "unknown on_delete behavior '{other}'"
            ))),
        }
    }
}

/// Many-to-one reference to another model's integer primary key.
///
/// Stored in column `<name>_id`.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    options: FieldOptions,
    to: String,
    on_delete: OnDelete,
}

impl ForeignKey {
    pub const PATH: &'static str = "sealfield_model.ForeignKey";

    pub fn new(to: impl Into<String>, on_delete: OnDelete) -> Self {
        Self {
            options: FieldOptions::default(),
            to: to.into(),
            on_delete,
        }
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn on_delete(&self) -> OnDelete {
        self.on_delete
    }

    pub fn from_deconstruction(d: &Deconstruction) -> FieldResult<Self> {
        Ok(Self {
            options: base::options_from(d)?,
            to: d.require_text("to")?.to_string(),
            on_delete: d.require_text("on_delete")?.parse()?,
        })
    }
}

impl Field for ForeignKey {
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
        "Foreign Key (type determined by related field)".to_string()
    }

    fn internal_type(&self) -> InternalType {
        InternalType::ForeignKey
    }

    fn is_relation(&self) -> bool {
        true
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        coerce_integer(value)
    }

    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        self.to_python(value)
    }

    fn check(&self) -> Vec<CheckMessage> {
        let mut errors = base::check(self);
        if self.to.trim().is_empty() {
            errors.push(CheckMessage::error(
                "Field defines a relation with model '', which is either not installed, or is abstract.",
                "fields.E300",
            ));
        }
        if self.on_delete == OnDelete::SetNull && !self.options.null {
            errors.push(
                CheckMessage::error(
                    "Field specifies on_delete=SET_NULL, but cannot be null.",
                    "fields.E320",
                )
                .with_hint("Set null=True argument on the field, or change the on_delete rule."),
            );
        }
        errors
    }

    fn set_attributes_from_name(&mut self, name: &str) {
        base::set_attributes_from_name(&mut self.options, name);
        let attname = format!("{name}_id");
        self.options.column = Some(self.options.db_column.clone().unwrap_or_else(|| attname.clone()));
        self.options.attname = Some(attname);
    }

    fn deconstruct(&self) -> Deconstruction {
        let mut d = base::deconstruct(self);
        d.kwargs
            .insert("to".into(), Argument::Value(Value::Text(self.to.clone())));
        d.kwargs.insert(
            "on_delete".into(),
            Argument::Value(Value::Text(self.on_delete.as_str().to_string())),
        );
        d
    }
}
