use super::invalid;
use crate::base;
use crate::error::FieldResult;
use crate::field::{Connection, Deconstruction, Field, InternalType};
use crate::options::FieldOptions;
use crate::value::Value;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years representable as four-digit text on every backend.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

fn year_in_range(value: Value, year: i32) -> FieldResult<Value> {
    if YEARS.contains(&year) {
        Ok(value)
    } else {
        Err(invalid(format!(
            "{value} value is out of range. The year must be between 1 and 9999."
        )))
    }
}

/// Calendar date without time.
#[derive(Debug, Clone, Default)]
pub struct DateField {
    options: FieldOptions,
}

impl DateField {
    pub const PATH: &'static str = "sealfield_model.DateField";

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

impl Field for DateField {
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
        "Date (without time)".to_string()
    }

    fn internal_type(&self) -> InternalType {
        InternalType::Date
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        match value {
            Value::Null => Ok(value),
            Value::Date(d) => year_in_range(value, d.year()),
            Value::DateTime(dt) => year_in_range(Value::Date(dt.date_naive()), dt.year()),
            Value::Text(ref s) => {
                let date = NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
                    invalid(format!(
                        "{value} value has an invalid date format. It must be in YYYY-MM-DD format."
                    ))
                })?;
                year_in_range(Value::Date(date), date.year())
            }
            other => Err(invalid(format!(
                "{other} value has an invalid date format. It must be in YYYY-MM-DD format."
            ))),
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
            Value::Date(d) if connection.stores_temporal_as_text() => {
                Ok(Value::Text(d.format(DATE_FORMAT).to_string()))
            }
            other => Ok(other),
        }
    }

    fn from_db_value(&self, value: Value, _connection: &Connection) -> FieldResult<Value> {
        self.to_python(value)
    }
}

/// Timezone-aware instant, normalised to UTC.
#[derive(Debug, Clone, Default)]
pub struct DateTimeField {
    options: FieldOptions,
}

impl DateTimeField {
    pub const PATH: &'static str = "sealfield_model.DateTimeField";

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

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl Field for DateTimeField {
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
        "Date (with time)".to_string()
    }

    fn internal_type(&self) -> InternalType {
        InternalType::DateTime
    }

    fn to_python(&self, value: Value) -> FieldResult<Value> {
        match value {
            Value::Null => Ok(value),
            Value::DateTime(dt) => year_in_range(value, dt.year()),
            Value::Date(d) => match d.and_hms_opt(0, 0, 0) {
                Some(naive) => year_in_range(Value::DateTime(naive.and_utc()), d.year()),
                None => Ok(Value::Null),
            },
            Value::Text(ref s) => {
                let dt = parse_datetime(s).ok_or_else(|| {
                    invalid(format!(
                        "{value} value has an invalid format. It must be in YYYY-MM-DD HH:MM[:ss[.uuuuuu]][TZ] format."
                    ))
                })?;
                year_in_range(Value::DateTime(dt), dt.year())
            }
            other => Err(invalid(format!(
                "{other} value has an invalid format. It must be in YYYY-MM-DD HH:MM[:ss[.uuuuuu]][TZ] format."
            ))),
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
            Value::DateTime(dt) if connection.stores_temporal_as_text() => Ok(Value::Text(
                dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            other => Ok(other),
        }
    }

    fn from_db_value(&self, value: Value, _connection: &Connection) -> FieldResult<Value> {
        self.to_python(value)
    }
}
