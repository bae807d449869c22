use crate::error::{FieldError, FieldResult};
use crate::field::{Deconstruction, Field};
use crate::fields::{
    BooleanField, CharField, DateField, DateTimeField, FloatField, ForeignKey, IntegerField,
    JsonField, TextField,
};
use std::collections::HashMap;
use std::fmt;

/// Builds a field from its deconstruction.
///
/// The registry is passed along so wrapper fields can rebuild what they wrap.
pub type FieldConstructor =
    Box<dyn Fn(&Deconstruction, &FieldRegistry) -> FieldResult<Box<dyn Field>> + Send + Sync>;

/// Maps deconstruction paths to constructors.
#[derive(Default)]
pub struct FieldRegistry {
    constructors: HashMap<String, FieldConstructor>,
}

impl FieldRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that knows every built-in field.
    pub fn with_builtin_fields() -> Self {
        let mut registry = Self::new();
        registry.register(BooleanField::PATH, |d, _| {
            Ok(Box::new(BooleanField::from_deconstruction(d)?))
        });
        registry.register(IntegerField::PATH, |d, _| {
            Ok(Box::new(IntegerField::from_deconstruction(d)?))
        });
        registry.register(FloatField::PATH, |d, _| {
            Ok(Box::new(FloatField::from_deconstruction(d)?))
        });
        registry.register(CharField::PATH, |d, _| {
            Ok(Box::new(CharField::from_deconstruction(d)?))
        });
        registry.register(TextField::PATH, |d, _| {
            Ok(Box::new(TextField::from_deconstruction(d)?))
        });
        registry.register(DateField::PATH, |d, _| {
            Ok(Box::new(DateField::from_deconstruction(d)?))
        });
        registry.register(DateTimeField::PATH, |d, _| {
            Ok(Box::new(DateTimeField::from_deconstruction(d)?))
        });
        registry.register(JsonField::PATH, |d, _| {
            Ok(Box::new(JsonField::from_deconstruction(d)?))
        });
        registry.register(ForeignKey::PATH, |d, _| {
            Ok(Box::new(ForeignKey::from_deconstruction(d)?))
        });
        registry
    }

    pub fn register<F>(&mut self, path: &str, constructor: F)
    where
        F: Fn(&Deconstruction, &FieldRegistry) -> FieldResult<Box<dyn Field>>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .insert(path.to_string(), Box::new(constructor));
    }

    pub fn contains(&self, path: &str) -> bool {
        self.constructors.contains_key(path)
    }

    /// Rebuilds a field and re-binds its name, if the declaration had one.
    pub fn reconstruct(&self, d: &Deconstruction) -> FieldResult<Box<dyn Field>> {
        let constructor = self
            .constructors
            .get(&d.path)
            .ok_or_else(|| FieldError::UnknownField(d.path.clone()))?;
        let mut field = constructor(d, self)?;
        if let Some(name) = &d.name {
            field.set_attributes_from_name(name);
        }
        Ok(field)
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        paths.sort_unstable();
        f.debug_struct("FieldRegistry").field("paths", &paths).finish()
    }
}
