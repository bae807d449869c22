//! Mapping between field values and SQLite storage classes.

use rusqlite::types::Value as SqlValue;
use sealfield_model::{InternalType, Value};

/// Column type for a field's internal type.
pub fn sql_type(internal: InternalType) -> &'static str {
    match internal {
        InternalType::Boolean | InternalType::Integer | InternalType::ForeignKey => "INTEGER",
        InternalType::Float => "REAL",
        InternalType::Char
        | InternalType::Text
        | InternalType::Date
        | InternalType::DateTime
        | InternalType::Json => "TEXT",
        InternalType::Binary => "BLOB",
    }
}

pub(crate) fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Values reaching this point are already prepared by their field; the
/// temporal and JSON arms only cover fields that skip text preparation.
pub(crate) fn to_sql(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(b)),
        Value::Integer(i) => SqlValue::Integer(i),
        Value::Float(f) => SqlValue::Real(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Bytes(b) => SqlValue::Blob(b),
        Value::Date(d) => SqlValue::Text(d.to_string()),
        Value::DateTime(dt) => SqlValue::Text(dt.to_rfc3339()),
        Value::Json(j) => SqlValue::Text(j.to_string()),
    }
}

pub(crate) fn from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Integer(i),
        SqlValue::Real(f) => Value::Float(f),
        SqlValue::Text(s) => Value::Text(s),
        SqlValue::Blob(b) => Value::Bytes(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypted_columns_are_blobs() {
        assert_eq!(sql_type(InternalType::Binary), "BLOB");
        assert_eq!(sql_type(InternalType::Boolean), "INTEGER");
    }

    #[test]
    fn quote_escapes_double_quotes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn bool_is_stored_as_integer() {
        assert_eq!(to_sql(Value::Bool(true)), SqlValue::Integer(1));
        assert_eq!(from_sql(SqlValue::Integer(1)), Value::Integer(1));
    }
}
