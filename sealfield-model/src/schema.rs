use crate::check::CheckMessage;
use crate::error::{FieldError, FieldResult, ValidationError};
use crate::field::{Deconstruction, Field};
use crate::handler::ModelHooks;
use crate::record::Record;
use crate::value::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A named, ordered set of fields: the declaration of one table.
pub struct ModelSchema {
    name: String,
    fields: Vec<Box<dyn Field>>,
    hooks: Option<Arc<dyn ModelHooks>>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            hooks: None,
        }
    }

    /// Builder-style [`add_field`](Self::add_field).
    pub fn with_field(mut self, name: &str, field: impl Field + 'static) -> Self {
        self.add_field(name, Box::new(field));
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ModelHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Binds `name` onto `field` and appends it.
    pub fn add_field(&mut self, name: &str, mut field: Box<dyn Field>) {
        field.set_attributes_from_name(name);
        self.fields.push(field);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Box<dyn Field>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&dyn Field> {
        self.fields
            .iter()
            .find(|f| f.name() == Some(name))
            .map(|f| f.as_ref())
    }

    pub fn hooks(&self) -> Option<&Arc<dyn ModelHooks>> {
        self.hooks.as_ref()
    }

    /// All field diagnostics plus model-level ones, each labelled `model.field`.
    pub fn check(&self) -> Vec<CheckMessage> {
        let mut messages = Vec::new();
        let mut seen = HashSet::new();

        for field in &self.fields {
            let field_name = field.name().unwrap_or("?");
            let label = format!("{}.{}", self.name, field_name);

            if !seen.insert(field_name) {
                messages.push(
                    CheckMessage::error(
                        format!("The field '{field_name}' clashes with the field '{field_name}' from model '{}'.", self.name),
                        "models.E006",
                    )
                    .with_obj(label.clone()),
                );
            }
            if field_name == "id" && !field.options().primary_key {
                messages.push(
                    CheckMessage::error(
                        "'id' can only be used as a field name if the field also sets 'primary_key=True'.",
                        "models.E004",
                    )
                    .with_obj(label.clone()),
                );
            }

            for message in field.check() {
                messages.push(match message.obj {
                    Some(_) => message,
                    None => message.with_obj(label.clone()),
                });
            }
        }
        messages
    }

    /// Cleans every declared field of `record` and runs model hooks.
    ///
    /// Missing values fall back to the field default, then null. All
    /// validation failures are collected, each tagged with its field.
    pub fn full_clean(&self, record: &Record) -> FieldResult<Record> {
        let mut cleaned = Record::new();
        cleaned.id = record.id;
        let mut errors = ValidationError::default();

        for field in &self.fields {
            let Some(name) = field.name() else { continue };
            let raw = record
                .get(name)
                .cloned()
                .or_else(|| field.options().default.clone())
                .unwrap_or(Value::Null);

            match field.clean(raw, Some(record)) {
                Ok(value) => cleaned.set(name, value),
                Err(FieldError::Validation(e)) => errors.extend(e.for_field(name)),
                Err(other) => return Err(other),
            }
        }

        if let Some(hooks) = &self.hooks {
            if let Err(e) = hooks.clean(&cleaned) {
                errors.extend(e);
            }
        }
        errors.into_result()?;
        Ok(cleaned)
    }

    /// Field declarations in order, for persisting a schema description.
    pub fn deconstruct(&self) -> Vec<Deconstruction> {
        self.fields.iter().map(|f| f.deconstruct()).collect()
    }
}

impl fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}
