use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use sealfield_model::{
    BooleanField, CharField, Connection, DateField, DateTimeField, Field, FieldError,
    FieldOptions, FloatField, ForeignKey, InternalType, IntegerField, JsonField, OnDelete,
    TextField, Validator, Value,
};
use serde_json::json;

fn validation_codes(err: FieldError) -> Vec<String> {
    match err {
        FieldError::Validation(e) => e.codes().into_iter().map(String::from).collect(),
        other => panic!("expected validation error, got {other}"),
    }
}

// ── BooleanField ─────────────────────────────────────────────────

#[test]
fn boolean_coerces_text_and_integers() {
    let f = BooleanField::new();
    assert_eq!(f.to_python("true".into()).unwrap(), Value::Bool(true));
    assert_eq!(f.to_python("0".into()).unwrap(), Value::Bool(false));
    assert_eq!(f.to_python(Value::Integer(1)).unwrap(), Value::Bool(true));
    assert_eq!(f.to_python(Value::Null).unwrap(), Value::Null);
}

#[test]
fn boolean_rejects_garbage() {
    let err = BooleanField::new().to_python("maybe".into()).unwrap_err();
    assert_eq!(validation_codes(err), vec!["invalid"]);
}

// ── IntegerField ─────────────────────────────────────────────────

#[test]
fn integer_coerces_text() {
    let f = IntegerField::new();
    assert_eq!(f.to_python(" 42 ".into()).unwrap(), Value::Integer(42));
    assert_eq!(f.to_python(Value::Float(7.0)).unwrap(), Value::Integer(7));
}

#[test]
fn integer_rejects_fraction_and_text() {
    let f = IntegerField::new();
    assert!(f.to_python(Value::Float(7.5)).is_err());
    let err = f.to_python("forty-two".into()).unwrap_err();
    assert!(format!("{err}").contains("'forty-two' value must be an integer."));
}

#[test]
fn integer_range_validators() {
    let f = IntegerField::new();
    assert!(f.run_validators(&Value::Integer(IntegerField::MAX)).is_ok());
    let err = f.run_validators(&Value::Integer(IntegerField::MAX + 1)).unwrap_err();
    assert_eq!(err.codes(), vec!["max_value"]);
    let err = f.run_validators(&Value::Integer(IntegerField::MIN - 1)).unwrap_err();
    assert_eq!(err.codes(), vec!["min_value"]);
}

#[test]
fn integer_prep_value_coerces() {
    let f = IntegerField::new();
    let prepared = f
        .get_db_prep_value("5".into(), &Connection::sqlite(), false)
        .unwrap();
    assert_eq!(prepared, Value::Integer(5));
}

#[test]
fn integer_prepared_skips_coercion() {
    let f = IntegerField::new();
    let prepared = f
        .get_db_prep_value("5".into(), &Connection::sqlite(), true)
        .unwrap();
    assert_eq!(prepared, Value::Text("5".into()));
}

// ── FloatField ───────────────────────────────────────────────────

#[test]
fn float_coerces_integer() {
    assert_eq!(
        FloatField::new().to_python(Value::Integer(3)).unwrap(),
        Value::Float(3.0)
    );
}

#[test]
fn float_rejects_non_finite() {
    let f = FloatField::new();
    for input in [
        Value::Float(f64::INFINITY),
        Value::Float(f64::NAN),
        Value::Text("inf".into()),
        Value::Text("NaN".into()),
    ] {
        assert_eq!(validation_codes(f.to_python(input).unwrap_err()), vec!["invalid"]);
    }
    assert_eq!(f.to_python("1e308".into()).unwrap(), Value::Float(1e308));
}

// ── CharField / TextField ────────────────────────────────────────

#[test]
fn char_field_max_length_validator() {
    let f = CharField::new(5);
    assert_eq!(f.max_length(), Some(5));
    assert!(f.run_validators(&"hello".into()).is_ok());
    let err = f.run_validators(&"toolong".into()).unwrap_err();
    assert_eq!(err.codes(), vec!["max_length"]);
    assert_eq!(
        err.messages(),
        vec!["Ensure this value has at most 5 characters (it has 7)."]
    );
}

#[test]
fn char_field_counts_characters_not_bytes() {
    let f = CharField::new(3);
    assert!(f.run_validators(&"日本語".into()).is_ok());
}

#[test]
fn char_field_requires_max_length() {
    let ids: Vec<String> = CharField::unbounded()
        .check()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["fields.E120"]);
}

#[test]
fn char_field_zero_max_length() {
    let ids: Vec<String> = CharField::new(0).check().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["fields.E121"]);
}

#[test]
fn char_field_choices_must_fit() {
    let f = CharField::new(2)
        .with_options(FieldOptions::new().choices([("abc", "ABC"), ("d", "D")]));
    let checks = f.check();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].id, "fields.E009");
}

#[test]
fn char_field_coerces_numbers() {
    let f = CharField::new(10);
    assert_eq!(f.to_python(Value::Integer(12)).unwrap(), Value::Text("12".into()));
    assert!(f.to_python(Value::Bytes(vec![1])).is_err());
}

#[test]
fn text_field_has_no_max_length() {
    let f = TextField::new();
    assert_eq!(f.max_length(), None);
    assert_eq!(f.internal_type(), InternalType::Text);
    assert!(f.run_validators(&"x".repeat(100_000).into()).is_ok());
}

// ── Dates ────────────────────────────────────────────────────────

#[test]
fn date_field_parses_and_prepares_for_sqlite() {
    let f = DateField::new();
    let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(f.to_python("2024-02-29".into()).unwrap(), Value::Date(d));

    let stored = f
        .get_db_prep_value(Value::Date(d), &Connection::sqlite(), false)
        .unwrap();
    assert_eq!(stored, Value::Text("2024-02-29".into()));

    let native = f
        .get_db_prep_value(Value::Date(d), &Connection::postgresql(), false)
        .unwrap();
    assert_eq!(native, Value::Date(d));

    assert_eq!(
        f.from_db_value(stored, &Connection::sqlite()).unwrap(),
        Value::Date(d)
    );
}

#[test]
fn date_field_rejects_bad_format() {
    let err = DateField::new().to_python("29/02/2024".into()).unwrap_err();
    assert!(format!("{err}").contains("YYYY-MM-DD"));
}

#[test]
fn datetime_field_roundtrips_through_text() {
    let f = DateTimeField::new();
    let dt = Utc.with_ymd_and_hms(2023, 11, 5, 8, 30, 15).unwrap();
    let stored = f
        .get_db_prep_value(Value::DateTime(dt), &Connection::sqlite(), false)
        .unwrap();
    assert_eq!(stored, Value::Text("2023-11-05T08:30:15Z".into()));
    assert_eq!(
        f.from_db_value(stored, &Connection::sqlite()).unwrap(),
        Value::DateTime(dt)
    );
}

#[test]
fn temporal_fields_reject_five_digit_years() {
    let beyond = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    assert_eq!(
        validation_codes(DateField::new().to_python(Value::Date(beyond)).unwrap_err()),
        vec!["invalid"]
    );

    let f = DateTimeField::new();
    let err = f
        .get_db_prep_value(
            Value::DateTime(beyond.and_hms_opt(0, 0, 0).unwrap().and_utc()),
            &Connection::sqlite(),
            false,
        )
        .unwrap_err();
    assert_eq!(validation_codes(err), vec!["invalid"]);
    assert!(f.to_python(Value::Date(beyond)).is_err());

    let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
    assert_eq!(
        DateField::new().to_python(Value::Date(last)).unwrap(),
        Value::Date(last)
    );
}

#[test]
fn datetime_field_accepts_naive_text_as_utc() {
    let f = DateTimeField::new();
    let dt = Utc.with_ymd_and_hms(2023, 11, 5, 8, 30, 0).unwrap();
    assert_eq!(
        f.to_python("2023-11-05 08:30".into()).unwrap(),
        Value::DateTime(dt)
    );
}

// ── JsonField ────────────────────────────────────────────────────

#[test]
fn json_field_stores_text_on_sqlite() {
    let f = JsonField::new();
    let doc = json!({"allergies": ["penicillin"]});
    let stored = f
        .get_db_prep_value(Value::Json(doc.clone()), &Connection::sqlite(), false)
        .unwrap();
    assert!(matches!(stored, Value::Text(_)));
    assert_eq!(
        f.from_db_value(stored, &Connection::sqlite()).unwrap(),
        Value::Json(doc)
    );
}

#[test]
fn json_field_wraps_scalars() {
    let f = JsonField::new();
    assert_eq!(f.to_python("x".into()).unwrap(), Value::Json(json!("x")));
    assert_eq!(f.to_python(Value::Integer(1)).unwrap(), Value::Json(json!(1)));
}

// ── ForeignKey ───────────────────────────────────────────────────

#[test]
fn foreign_key_is_relational() {
    let mut f = ForeignKey::new("clinic", OnDelete::Cascade);
    assert!(f.is_relation());
    f.set_attributes_from_name("clinic");
    assert_eq!(f.options().attname.as_deref(), Some("clinic_id"));
    assert_eq!(f.column(), Some("clinic_id"));
}

#[test]
fn foreign_key_set_null_requires_null() {
    let f = ForeignKey::new("clinic", OnDelete::SetNull);
    let ids: Vec<String> = f.check().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["fields.E320"]);

    let ok = ForeignKey::new("clinic", OnDelete::SetNull)
        .with_options(FieldOptions::new().nullable());
    assert!(ok.check().is_empty());
}

#[test]
fn on_delete_parses() {
    assert_eq!("SET_NULL".parse::<OnDelete>().unwrap(), OnDelete::SetNull);
    assert!("EXPLODE".parse::<OnDelete>().is_err());
}

// ── Shared behavior ──────────────────────────────────────────────

#[test]
fn validate_null_blank_and_choices() {
    let f = CharField::new(10);
    assert_eq!(f.validate(&Value::Null, None).unwrap_err().codes(), vec!["null"]);
    assert_eq!(f.validate(&"".into(), None).unwrap_err().codes(), vec!["blank"]);

    let relaxed = CharField::new(10).with_options(FieldOptions::new().nullable().allow_blank());
    assert!(relaxed.validate(&Value::Null, None).is_ok());
    assert!(relaxed.validate(&"".into(), None).is_ok());

    let choice = CharField::new(10).with_options(FieldOptions::new().choices([("a", "A")]));
    let err = choice.validate(&"b".into(), None).unwrap_err();
    assert_eq!(err.codes(), vec!["invalid_choice"]);
    assert_eq!(err.messages(), vec!["Value 'b' is not a valid choice."]);
}

#[test]
fn non_editable_fields_skip_validation() {
    let f = IntegerField::with_options(FieldOptions::new().not_editable());
    assert!(f.validate(&Value::Null, None).is_ok());
}

#[test]
fn run_validators_collects_all_failures() {
    let f = CharField::new(3).with_options(
        FieldOptions::new()
            .validator(Validator::MinLength(10))
            .validator(Validator::MaxLength(4)),
    );
    let err = f.run_validators(&"abcdefg".into()).unwrap_err();
    assert_eq!(err.codes(), vec!["max_length", "min_length", "max_length"]);
}

#[test]
fn run_validators_skips_empty_values() {
    let f = CharField::new(3).with_options(FieldOptions::new().validator(Validator::MinLength(2)));
    assert!(f.run_validators(&"".into()).is_ok());
    assert!(f.run_validators(&Value::Null).is_ok());
}

#[test]
fn field_name_checks() {
    for (name, id) in [("bad_", "fields.E001"), ("a__b", "fields.E002"), ("pk", "fields.E003")] {
        let mut f = IntegerField::new();
        f.set_attributes_from_name(name);
        let ids: Vec<String> = f.check().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![id.to_string()], "name {name}");
    }
}

#[test]
fn nullable_primary_key_rejected() {
    let f = IntegerField::with_options(FieldOptions::new().primary_key().nullable());
    let checks = f.check();
    assert_eq!(checks[0].id, "fields.E007");
    assert!(checks[0].hint.is_some());
}

#[test]
fn clean_coerces_then_validates() {
    let f = IntegerField::new();
    assert_eq!(f.clean("17".into(), None).unwrap(), Value::Integer(17));
    assert!(f.clean(Value::Null, None).is_err());
}

#[test]
fn set_attributes_uses_db_column() {
    let mut f = TextField::with_options(FieldOptions::new().db_column("notes_txt"));
    f.set_attributes_from_name("notes");
    assert_eq!(f.name(), Some("notes"));
    assert_eq!(f.column(), Some("notes_txt"));
    assert_eq!(f.options().display_name().as_deref(), Some("notes"));
}
