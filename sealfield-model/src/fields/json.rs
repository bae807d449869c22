use super::invalid;
use crate::base;
use crate::error::FieldResult;
use crate::field::{Connection, Deconstruction, Field, InternalType};
use crate::options::FieldOptions;
use crate::value::Value;

/// Arbitrary JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonField {
    options: FieldOptions,
}

impl JsonField {
    pub const PATH: &'static str = "sealfield_model.JSONField";

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

impl Field for JsonField {
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
        "A JSON object".to_string()
    }

    fn internal_type(&self) -> InternalType {
        InternalType::Json
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        use serde_json::Value as Json;
        match value {
            Value::Null | Value::Json(_) => Ok(value),
            Value::Bool(b) => Ok(Value::Json(Json::Bool(b))),
            Value::Integer(i) => Ok(Value::Json(Json::from(i))),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(|n| Value::Json(Json::Number(n)))
                .ok_or_else(|| invalid(format!("{f} is not JSON serializable."))),
            Value::Text(s) => Ok(Value::Json(Json::String(s))),
            Value::Date(d) => Ok(Value::Json(Json::String(d.to_string()))),
            Value::DateTime(dt) => Ok(Value::Json(Json::String(dt.to_rfc3339()))),
            Value::Bytes(b) => Err(invalid(format!("<{} bytes> is not JSON serializable.", b.len()))),
        }
    }

    fn get_prep_value(&self, value: Value) -> FieldResult<Value> {
        self.to_python(value)
    }

    fn get_db_prep_value(
        &self,
        value: Value,
        connection: &Connection,
        prepared: bool,
    ) -> FieldResult<Value> {
        let value = if prepared {
            value
        } else {
            self.get_prep_value(value)?
        };
        match value {
            Value::Json(j) if connection.stores_json_as_text() => {
                Ok(Value::Text(serde_json::to_string(&j)?))
            }
            other => Ok(other),
        }
    }

    fn from_db_value(&self, value: Value, _connection: &Connection) -> FieldResult<Value> {
        match value {
            Value::Text(s) => Ok(Value::Json(serde_json::from_str(&s)?)),
            other => Ok(other),
        }
    }
}
