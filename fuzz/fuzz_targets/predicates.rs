//! Fuzz target for the field predicates.
//!
//! Every predicate must answer for any input, and answer the same way twice.

#![no_main]

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use lifesaver_validation::*;

/// Arbitrary form value.
#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Integer(i64),
    Text(String),
    List(Vec<String>),
    Object,
}

impl From<&FuzzValue> for FieldValue {
    fn from(value: &FuzzValue) -> Self {
        match value {
            FuzzValue::Undefined => FieldValue::Undefined,
            FuzzValue::Null => FieldValue::Null,
            FuzzValue::Bool(b) => FieldValue::Bool(*b),
            FuzzValue::Number(n) => FieldValue::Number(*n),
            FuzzValue::Integer(n) => FieldValue::from(*n),
            FuzzValue::Text(s) => FieldValue::Text(s.clone()),
            FuzzValue::List(items) => FieldValue::Array(items.iter().map(FieldValue::from).collect()),
            FuzzValue::Object => FieldValue::Object,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    value: FuzzValue,
    /// Offset for naive date-times, in minutes
    offset_minutes: i16,
    /// Seconds since the epoch for the pinned clock
    now_secs: u32,
}

fuzz_target!(|input: FuzzInput| {
    let Some(now) = Utc.timestamp_opt(i64::from(input.now_secs), 0).single() else {
        return;
    };
    let zone = NaiveZone::fixed_minutes(i32::from(input.offset_minutes)).unwrap_or_default();
    let validator = FieldValidator::new()
        .with_clock(FixedClock::new(now))
        .with_naive_zone(zone);

    let value = FieldValue::from(&input.value);

    let verdicts = |v: &FieldValue| {
        [
            validator.validate_email(v),
            validator.validate_phone(v),
            validator.validate_zip_code(v),
            validator.validate_name(v),
            validator.validate_password(v),
            validator.validate_date_not_in_future(v),
            validator.validate_date_in_future(v),
            validator.validate_positive_integer(v),
        ]
    };

    assert_eq!(verdicts(&value), verdicts(&value));

    // Empty input always passes the date checks.
    if !value.is_truthy() {
        assert!(validator.validate_date_not_in_future(&value));
        assert!(validator.validate_date_in_future(&value));
    }

    // A parseable moment passes at least one of the two date checks.
    if value.is_truthy() && moment_of(&value, zone).is_some() {
        assert!(
            validator.validate_date_not_in_future(&value)
                || validator.validate_date_in_future(&value)
        );
    }

    let _ = value.coerce_to_string();
    let _ = value.coerce_to_number();
});
