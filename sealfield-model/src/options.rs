use crate::validators::Validator;
use crate::value::Value;

/// Options every field carries, independent of its logical type.
///
/// `name`, `attname` and `column` are filled in by
/// [`Field::set_attributes_from_name`](crate::Field::set_attributes_from_name);
/// everything else is declared by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    pub name: Option<String>,
    pub attname: Option<String>,
    pub column: Option<String>,
    pub db_column: Option<String>,
    pub verbose_name: Option<String>,
    pub null: bool,
    pub blank: bool,
    pub default: Option<Value>,
    pub unique: bool,
    pub primary_key: bool,
    pub db_index: bool,
    pub editable: bool,
    pub choices: Vec<(Value, String)>,
    pub help_text: String,
    pub validators: Vec<Validator>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            name: None,
            attname: None,
            column: None,
            db_column: None,
            verbose_name: None,
            null: false,
            blank: false,
            default: None,
            unique: false,
            primary_key: false,
            db_index: false,
            editable: true,
            choices: Vec::new(),
            help_text: String::new(),
            validators: Vec::new(),
        }
    }
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    pub fn allow_blank(mut self) -> Self {
        self.blank = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn db_index(mut self) -> Self {
        self.db_index = true;
        self
    }

    pub fn not_editable(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn db_column(mut self, column: impl Into<String>) -> Self {
        self.db_column = Some(column.into());
        self
    }

    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = Some(name.into());
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    pub fn choices<V: Into<Value>>(mut self, choices: impl IntoIterator<Item = (V, &'static str)>) -> Self {
        self.choices = choices
            .into_iter()
            .map(|(v, label)| (v.into(), label.to_string()))
            .collect();
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Human-readable name: declared, or derived from the field name.
    pub fn display_name(&self) -> Option<String> {
        self.verbose_name
            .clone()
            .or_else(|| self.name.as_ref().map(|n| n.replace('_', " ")))
    }
}
