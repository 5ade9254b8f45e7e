// The eight field predicates
//
// Every predicate is total: it coerces its input and answers true or false,
// never panics and never logs.

use crate::dates::{NaiveZone, moment_of};
use crate::{Clock, FieldValue, SystemClock};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

// U+FEFF is whitespace to a browser's `\s` but not to Unicode White_Space.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$").unwrap()
});

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s\x{FEFF}]{2,}$").unwrap());

static ZIP_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5,6}$").unwrap());

pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Validator using the system clock and the host's local zone, shared by the
/// free functions.
static SYSTEM_VALIDATOR: Lazy<FieldValidator> = Lazy::new(FieldValidator::new);

fn is_email(value: &FieldValue) -> bool {
    EMAIL_REGEX.is_match(&value.coerce_to_string().to_lowercase())
}

fn is_phone(value: &FieldValue) -> bool {
    let digits = value
        .coerce_to_string()
        .chars()
        .filter(char::is_ascii_digit)
        .count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

fn is_zip_code(value: &FieldValue) -> bool {
    ZIP_CODE_REGEX.is_match(&value.coerce_to_string())
}

fn is_name(value: &FieldValue) -> bool {
    NAME_REGEX.is_match(&value.coerce_to_string())
}

fn is_password(value: &FieldValue) -> bool {
    // Browsers count UTF-16 code units.
    value.coerce_to_string().encode_utf16().count() >= PASSWORD_MIN_LENGTH
}

fn is_positive_integer(value: &FieldValue) -> bool {
    let n = value.coerce_to_number();
    n.is_finite() && n.fract() == 0.0 && n > 0.0
}

/// Stateless field checks with an injectable clock.
///
/// The pattern predicates behave identically on every instance. The two
/// date predicates compare against [`Clock::now`] and interpret date-times
/// without an offset in the configured [`NaiveZone`]. The fail-fast flag is
/// read by form validation, not by the predicates.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use lifesaver_validation::{FieldValidator, FixedClock};
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let validator = FieldValidator::new().with_clock(FixedClock::new(now));
///
/// assert!(validator.validate_date_not_in_future("2024-04-30"));
/// assert!(!validator.validate_date_not_in_future("2024-05-02"));
/// assert!(validator.validate_date_not_in_future(""));
/// ```
#[derive(Debug, Clone)]
pub struct FieldValidator {
    clock: Arc<dyn Clock>,
    naive_zone: NaiveZone,
    fail_fast: bool,
}

impl FieldValidator {
    /// System clock, host local zone, all errors reported.
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            naive_zone: NaiveZone::Local,
            fail_fast: false,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_naive_zone(mut self, zone: NaiveZone) -> Self {
        self.naive_zone = zone;
        self
    }

    /// Stop form validation at the first failing check.
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    pub fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    pub fn naive_zone(&self) -> NaiveZone {
        self.naive_zone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn validate_email(&self, value: impl Into<FieldValue>) -> bool {
        is_email(&value.into())
    }

    pub fn validate_phone(&self, value: impl Into<FieldValue>) -> bool {
        is_phone(&value.into())
    }

    pub fn validate_zip_code(&self, value: impl Into<FieldValue>) -> bool {
        is_zip_code(&value.into())
    }

    pub fn validate_name(&self, value: impl Into<FieldValue>) -> bool {
        is_name(&value.into())
    }

    pub fn validate_password(&self, value: impl Into<FieldValue>) -> bool {
        is_password(&value.into())
    }

    /// Empty values pass; unparseable dates fail.
    pub fn validate_date_not_in_future(&self, value: impl Into<FieldValue>) -> bool {
        let value = value.into();
        if !value.is_truthy() {
            return true;
        }
        moment_of(&value, self.naive_zone).is_some_and(|moment| moment <= self.now())
    }

    /// Empty values pass; unparseable dates fail.
    pub fn validate_date_in_future(&self, value: impl Into<FieldValue>) -> bool {
        let value = value.into();
        if !value.is_truthy() {
            return true;
        }
        moment_of(&value, self.naive_zone).is_some_and(|moment| moment >= self.now())
    }

    pub fn validate_positive_integer(&self, value: impl Into<FieldValue>) -> bool {
        is_positive_integer(&value.into())
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower-cased value has the shape `local@domain.tld`, no whitespace and a
/// single `@`. Syntax only; deliverability is not checked.
pub fn validate_email(value: impl Into<FieldValue>) -> bool {
    is_email(&value.into())
}

/// 10 to 15 digits once every non-digit character is removed.
pub fn validate_phone(value: impl Into<FieldValue>) -> bool {
    is_phone(&value.into())
}

/// Exactly 5 or 6 digits and nothing else.
pub fn validate_zip_code(value: impl Into<FieldValue>) -> bool {
    is_zip_code(&value.into())
}

/// At least two characters, ASCII letters and whitespace only.
pub fn validate_name(value: impl Into<FieldValue>) -> bool {
    is_name(&value.into())
}

/// At least 8 characters. No complexity rules.
pub fn validate_password(value: impl Into<FieldValue>) -> bool {
    is_password(&value.into())
}

/// Empty passes; otherwise the date must be at or before now (system clock).
pub fn validate_date_not_in_future(value: impl Into<FieldValue>) -> bool {
    SYSTEM_VALIDATOR.validate_date_not_in_future(value)
}

/// Empty passes; otherwise the date must be at or after now (system clock).
pub fn validate_date_in_future(value: impl Into<FieldValue>) -> bool {
    SYSTEM_VALIDATOR.validate_date_in_future(value)
}

/// A finite whole number greater than zero after numeric coercion.
pub fn validate_positive_integer(value: impl Into<FieldValue>) -> bool {
    is_positive_integer(&value.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use chrono::{Duration, TimeZone};

    fn pinned() -> (FieldValidator, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let validator = FieldValidator::new()
            .with_clock(FixedClock::new(now))
            .with_naive_zone(NaiveZone::utc());
        (validator, now)
    }

    #[test]
    fn test_email() {
        assert!(validate_email("a@b.co"));
        assert!(validate_email("A@B.COM"));
        assert!(validate_email("first.last+tag@mail.example.org"));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a b@c.d"));
        assert!(!validate_email("a@@b.c"));
        assert!(!validate_email("@b.c"));
        assert!(!validate_email(""));
        assert!(!validate_email(FieldValue::Null));
    }

    #[test]
    fn test_email_without_at_sign_never_matches() {
        for s in ["plainaddress", "a.b.c", "x", "user.example.com", "1234"] {
            assert!(!validate_email(s), "{} accepted", s);
        }
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("123-456-7890"));
        assert!(validate_phone("+44 (20) 7946 0958"));
        assert!(validate_phone("1".repeat(15)));
        assert!(!validate_phone("1".repeat(16)));
        assert!(!validate_phone("12345"));
        assert!(!validate_phone("phone"));
        assert!(validate_phone(1234567890u64));
    }

    #[test]
    fn test_phone_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not decimal digits for this check.
        assert!(!validate_phone("١٢٣٤٥٦٧٨٩٠"));
    }

    #[test]
    fn test_zip_code() {
        assert!(validate_zip_code("12345"));
        assert!(validate_zip_code("123456"));
        assert!(validate_zip_code(12345));
        assert!(!validate_zip_code("1234"));
        assert!(!validate_zip_code("1234567"));
        assert!(!validate_zip_code("12-345"));
        assert!(!validate_zip_code(" 12345"));
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Jo"));
        assert!(validate_name("Mary Ann"));
        assert!(!validate_name("J"));
        assert!(!validate_name("John3"));
        assert!(!validate_name("O'Brien"));
        assert!(!validate_name("José"));
        // String(undefined) and String(null) are all letters.
        assert!(validate_name(FieldValue::Undefined));
        assert!(validate_name(FieldValue::Null));
        assert!(!validate_name(FieldValue::Object));
    }

    #[test]
    fn test_password() {
        assert!(!validate_password("1234567"));
        assert!(validate_password("12345678"));
        assert!(validate_password("        "));
        assert!(!validate_password(FieldValue::Null));
        assert!(validate_password(FieldValue::Undefined));
        assert!(validate_password(serde_json::json!([1234, 5678])));
    }

    #[test]
    fn test_arrays_validate_through_their_string_form() {
        assert!(validate_email(serde_json::json!(["donor@example.com"])));
        assert!(!validate_email(serde_json::json!(["a@b.co", "c@d.co"])));
        assert!(validate_zip_code(serde_json::json!([560001])));
        assert!(validate_positive_integer(serde_json::json!([5])));
        assert!(!validate_positive_integer(serde_json::json!([1, 2])));
        assert!(!validate_positive_integer(serde_json::json!([])));
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        assert!(!validate_email("a\u{feff}b@c.d"));
        assert!(!validate_email("ab@c\u{feff}.d"));
        assert!(!validate_email("\u{feff}@c.d"));
        assert!(validate_name("Jo\u{feff}"));
        assert!(validate_name("\u{feff}\u{feff}"));
        assert!(!validate_name("J\u{feff}3"));
    }

    #[test]
    fn test_positive_integer() {
        assert!(validate_positive_integer("5"));
        assert!(validate_positive_integer(5));
        assert!(validate_positive_integer(" 7 "));
        assert!(validate_positive_integer("0x10"));
        assert!(validate_positive_integer("5.0"));
        assert!(validate_positive_integer(true));
        assert!(!validate_positive_integer("5.5"));
        assert!(!validate_positive_integer("0"));
        assert!(!validate_positive_integer("-3"));
        assert!(!validate_positive_integer(""));
        assert!(!validate_positive_integer("five"));
        assert!(!validate_positive_integer(f64::INFINITY));
        assert!(!validate_positive_integer(FieldValue::Undefined));
    }

    #[test]
    fn test_date_not_in_future() {
        let (validator, now) = pinned();
        let yesterday = (now - Duration::days(1)).to_rfc3339();
        let tomorrow = (now + Duration::days(1)).to_rfc3339();

        assert!(validator.validate_date_not_in_future(""));
        assert!(validator.validate_date_not_in_future(FieldValue::Undefined));
        assert!(validator.validate_date_not_in_future(yesterday.as_str()));
        assert!(validator.validate_date_not_in_future(now.to_rfc3339()));
        assert!(!validator.validate_date_not_in_future(tomorrow.as_str()));
    }

    #[test]
    fn test_date_in_future() {
        let (validator, now) = pinned();
        let yesterday = (now - Duration::days(1)).to_rfc3339();
        let tomorrow = (now + Duration::days(1)).to_rfc3339();

        assert!(validator.validate_date_in_future(None::<&str>));
        assert!(validator.validate_date_in_future(FieldValue::Null));
        assert!(validator.validate_date_in_future(tomorrow.as_str()));
        assert!(validator.validate_date_in_future(now.to_rfc3339()));
        assert!(!validator.validate_date_in_future(yesterday.as_str()));
    }

    #[test]
    fn test_unparseable_dates_fail_both_checks() {
        let (validator, _) = pinned();
        for value in ["not a date", "2024-02-30", "   "] {
            assert!(!validator.validate_date_not_in_future(value));
            assert!(!validator.validate_date_in_future(value));
        }
        assert!(!validator.validate_date_in_future(true));
    }

    #[test]
    fn test_epoch_millis_dates() {
        let (validator, now) = pinned();
        let past = (now - Duration::hours(1)).timestamp_millis();
        assert!(validator.validate_date_not_in_future(past));
        assert!(!validator.validate_date_in_future(past));
        // Zero is falsy and passes both.
        assert!(validator.validate_date_in_future(0));
    }

    #[test]
    fn test_date_only_values_against_pinned_clock() {
        let (validator, _) = pinned();
        assert!(validator.validate_date_not_in_future("2024-05-01"));
        assert!(!validator.validate_date_in_future("2024-05-01"));
        assert!(validator.validate_date_in_future("2024-05-02"));
    }

    #[test]
    fn test_naive_zone_shifts_comparison() {
        let (validator, _) = pinned();
        // 13:00 at UTC+02:00 is 11:00Z, before the pinned noon.
        let east = validator
            .clone()
            .with_naive_zone(NaiveZone::fixed_minutes(120).unwrap());
        assert!(east.validate_date_not_in_future("2024-05-01T13:00"));
        assert!(!validator.validate_date_not_in_future("2024-05-01T13:00"));
    }

    #[test]
    fn test_idempotent() {
        let (validator, _) = pinned();
        for value in ["a@b.co", "12345", "Jo", "2024-04-01", "x"] {
            assert_eq!(validate_email(value), validate_email(value));
            assert_eq!(validate_zip_code(value), validate_zip_code(value));
            assert_eq!(
                validator.validate_date_not_in_future(value),
                validator.validate_date_not_in_future(value)
            );
        }
    }

    #[test]
    fn test_system_clock_free_functions() {
        assert!(validate_date_not_in_future("2000-01-01"));
        assert!(!validate_date_in_future("2000-01-01"));
        assert!(validate_date_in_future("9999-12-31"));
        assert!(validate_date_not_in_future(""));
    }
}
