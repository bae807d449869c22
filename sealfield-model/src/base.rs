//! Behavior shared by every field.
//!
//! These are the bodies of the [`Field`] default methods, exposed so that a
//! field overriding a method can still run the shared part first.

use crate::check::CheckMessage;
use crate::error::{FieldError, FieldResult, ValidationError};
use crate::field::{Argument, Deconstruction, Field};
use crate::options::FieldOptions;
use crate::value::Value;

/// Name, choices and primary-key checks.
pub fn check<F: Field + ?Sized>(field: &F) -> Vec<CheckMessage> {
    let options = field.options();
    let mut errors = Vec::new();
    errors.extend(check_field_name(options));
    errors.extend(check_choices(options, field.max_length()));
    errors.extend(check_null_allowed_for_primary_keys(options));
    errors
}

fn check_field_name(options: &FieldOptions) -> Option<CheckMessage> {
    let name = options.name.as_deref()?;
    if name.ends_with('_') {
        Some(CheckMessage::error(
            "Field names must not end with an underscore.",
            "fields.E001",
        ))
    } else if name.contains("__") {
        Some(CheckMessage::error(
            "Field names must not contain \"__\".",
            "fields.E002",
        ))
    } else if name == "pk" {
        Some(CheckMessage::error(
            "'pk' is a reserved word that cannot be used as a field name.",
            "fields.E003",
        ))
    } else {
        None
    }
}

fn check_choices(options: &FieldOptions, max_length: Option<usize>) -> Option<CheckMessage> {
    let max_length = max_length?;
    let longest = options
        .choices
        .iter()
        .filter_map(|(v, _)| v.as_str())
        .map(|s| s.chars().count())
        .max()?;
    (longest > max_length).then(|| {
        CheckMessage::error(
            format!(
                "'max_length' is too small to fit the longest value in 'choices' ({longest} characters)."
            ),
            "fields.E009",
        )
    })
}

fn check_null_allowed_for_primary_keys(options: &FieldOptions) -> Option<CheckMessage> {
    (options.primary_key && options.null).then(|| {
        CheckMessage::error("Primary keys must not have null=True.", "fields.E007")
            .with_hint("Set null=False on the field, or remove primary_key=True argument.")
    })
}

pub fn set_attributes_from_name(options: &mut FieldOptions, name: &str) {
    options.name = Some(name.to_string());
    options.attname = Some(name.to_string());
    options.column = Some(options.db_column.clone().unwrap_or_else(|| name.to_string()));
}

/// Checks choices, then null, then blank; the first failure is returned.
///
/// Non-editable fields are skipped.
pub fn validate(options: &FieldOptions, value: &Value) -> Result<(), ValidationError> {
    if !options.editable {
        return Ok(());
    }

    if !options.choices.is_empty()
        && !value.is_empty_value()
        && !options.choices.iter().any(|(choice, _)| choice == value)
    {
        return Err(ValidationError::new(
            "invalid_choice",
            format!("Value {value} is not a valid choice."),
        ));
    }

    if value.is_null() && !options.null {
        return Err(ValidationError::new("null", "This field cannot be null."));
    }

    if !options.blank && value.is_empty_value() {
        return Err(ValidationError::new("blank", "This field cannot be blank."));
    }

    Ok(())
}

/// Runs every default and declared validator; empty values are skipped.
pub fn run_validators<F: Field + ?Sized>(field: &F, value: &Value) -> Result<(), ValidationError> {
    if value.is_empty_value() {
        return Ok(());
    }
    let mut errors = ValidationError::default();
    let declared = field.options().validators.iter().cloned();
    for validator in field.default_validators().into_iter().chain(declared) {
        if let Err(e) = validator.validate(value) {
            errors.extend(e);
        }
    }
    errors.into_result()
}

/// Emits the options that differ from their defaults.
pub fn deconstruct<F: Field + ?Sized>(field: &F) -> Deconstruction {
    let options = field.options();
    let defaults = FieldOptions::default();
    let mut d = Deconstruction::new(field.path());
    d.name = options.name.clone();

    let mut flag = |key: &str, value: bool, default: bool| {
        if value != default {
            d.kwargs
                .insert(key.to_string(), Argument::Value(Value::Bool(value)));
        }
    };
    flag("null", options.null, defaults.null);
    flag("blank", options.blank, defaults.blank);
    flag("unique", options.unique, defaults.unique);
    flag("primary_key", options.primary_key, defaults.primary_key);
    flag("db_index", options.db_index, defaults.db_index);
    flag("editable", options.editable, defaults.editable);

    if let Some(verbose_name) = &options.verbose_name {
        d.kwargs.insert(
            "verbose_name".into(),
            Argument::Value(Value::Text(verbose_name.clone())),
        );
    }
    if let Some(db_column) = &options.db_column {
        d.kwargs.insert(
            "db_column".into(),
            Argument::Value(Value::Text(db_column.clone())),
        );
    }
    if let Some(default) = &options.default {
        d.kwargs
            .insert("default".into(), Argument::Value(default.clone()));
    }
    if !options.help_text.is_empty() {
        d.kwargs.insert(
            "help_text".into(),
            Argument::Value(Value::Text(options.help_text.clone())),
        );
    }
    if !options.choices.is_empty() {
        d.kwargs
            .insert("choices".into(), Argument::Choices(options.choices.clone()));
    }
    if !options.validators.is_empty() {
        d.kwargs.insert(
            "validators".into(),
            Argument::Validators(options.validators.clone()),
        );
    }
    d
}

/// Rebuilds the shared options from a deconstruction.
///
/// Field-specific kwargs are left for the caller to read.
pub fn options_from(d: &Deconstruction) -> FieldResult<FieldOptions> {
    let mut options = FieldOptions::default();
    let flag = |key: &str, default: bool| -> FieldResult<bool> {
        match d.value(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(FieldError::InvalidDeclaration(format!(
                "{}: '{key}' must be a bool, got {other}",
                d.path
            ))),
        }
    };
    options.null = flag("null", false)?;
    options.blank = flag("blank", false)?;
    options.unique = flag("unique", false)?;
    options.primary_key = flag("primary_key", false)?;
    options.db_index = flag("db_index", false)?;
    options.editable = flag("editable", true)?;

    options.verbose_name = d.value("verbose_name").and_then(Value::as_str).map(String::from);
    options.db_column = d.value("db_column").and_then(Value::as_str).map(String::from);
    options.default = d.value("default").cloned();
    options.help_text = d
        .value("help_text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if let Some(Argument::Choices(choices)) = d.kwargs.get("choices") {
        options.choices = choices.clone();
    }
    if let Some(Argument::Validators(validators)) = d.kwargs.get("validators") {
        options.validators = validators.clone();
    }
    Ok(options)
}
