// Field validators: predicate verdicts turned into ValidationErrors
//
// Messages are the ones the donor, hospital and supplier screens show.

use crate::predicates;
use crate::{FieldValidator, ValidationError, field_label};

/// Length as a browser reports it (UTF-16 code units).
fn browser_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Value must be present (non-empty).
pub struct Required;

impl Required {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            Err(
                ValidationError::new(field, format!("{} is required.", field_label(field)))
                    .with_constraint("required"),
            )
        } else {
            Ok(())
        }
    }
}

/// Minimum length.
pub struct MinLength(pub usize);

impl MinLength {
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if browser_len(value) < self.0 {
            Err(ValidationError::new(
                field,
                format!(
                    "Please enter a valid {} (min {} characters).",
                    field_label(field).to_lowercase(),
                    self.0
                ),
            )
            .with_constraint("minLength")
            .with_value(value))
        } else {
            Ok(())
        }
    }
}

pub struct IsEmail;

impl IsEmail {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if predicates::validate_email(value) {
            Ok(())
        } else {
            Err(
                ValidationError::new(field, "Please enter a valid email address.")
                    .with_constraint("isEmail")
                    .with_value(value),
            )
        }
    }
}

pub struct IsPhone;

impl IsPhone {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if predicates::validate_phone(value) {
            Ok(())
        } else {
            Err(
                ValidationError::new(field, "Please enter a valid 10-15 digit phone number.")
                    .with_constraint("isPhone")
                    .with_value(value),
            )
        }
    }
}

pub struct IsZipCode;

impl IsZipCode {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if predicates::validate_zip_code(value) {
            Ok(())
        } else {
            Err(
                ValidationError::new(field, "Please enter a valid zip code (5-6 digits).")
                    .with_constraint("isZipCode")
                    .with_value(value),
            )
        }
    }
}

/// Person name: letters and spaces, at least two characters.
pub struct IsName;

impl IsName {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if predicates::validate_name(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!(
                    "{} should contain only letters and be at least 2 characters long.",
                    field_label(field)
                ),
            )
            .with_constraint("isName")
            .with_value(value))
        }
    }
}

/// Password length. The rejected value is never attached to the error.
pub struct IsPassword;

impl IsPassword {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if predicates::validate_password(value) {
            Ok(())
        } else {
            Err(
                ValidationError::new(field, "Password must be at least 8 characters long.")
                    .with_constraint("isPassword"),
            )
        }
    }
}

/// Date at or before the validator's "now". Empty passes.
pub struct NotInFuture<'a>(pub &'a FieldValidator);

impl NotInFuture<'_> {
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if self.0.validate_date_not_in_future(value) {
            Ok(())
        } else {
            Err(
                ValidationError::new(field, format!("{} cannot be in the future.", field_label(field)))
                    .with_constraint("notInFuture")
                    .with_value(value),
            )
        }
    }
}

/// Date at or after the validator's "now". Empty passes.
pub struct InFuture<'a>(pub &'a FieldValidator);

impl InFuture<'_> {
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if self.0.validate_date_in_future(value) {
            Ok(())
        } else {
            Err(
                ValidationError::new(field, format!("{} must be in the future.", field_label(field)))
                    .with_constraint("inFuture")
                    .with_value(value),
            )
        }
    }
}

pub struct IsPositiveInteger;

impl IsPositiveInteger {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if predicates::validate_positive_integer(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!("{} must be a positive whole number.", field_label(field)),
            )
            .with_constraint("isPositiveInteger")
            .with_value(value))
        }
    }
}

/// Confirmation field equal to the original (`confirm_password`).
pub struct FieldsMatch;

impl FieldsMatch {
    pub fn validate(value: &str, original: &str, field: &str) -> Result<(), ValidationError> {
        if value == original {
            Ok(())
        } else {
            Err(
                ValidationError::new(field, format!("{} does not match.", field_label(field)))
                    .with_constraint("matches"),
            )
        }
    }
}

/// Two fields that must not hold the same value.
pub struct FieldsDiffer;

impl FieldsDiffer {
    pub fn validate(
        value: &str,
        other: &str,
        field: &str,
        other_field: &str,
    ) -> Result<(), ValidationError> {
        if value != other {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!(
                    "{} cannot be the same as {}.",
                    field_label(field),
                    field_label(other_field).to_lowercase()
                ),
            )
            .with_constraint("differs")
            .with_value(value))
        }
    }
}

/// Closure-style wrappers for [`ValidationRules`](crate::ValidationRules).
pub mod rule {
    use super::*;

    pub fn required(value: &str, field: &str) -> Result<(), ValidationError> {
        Required::validate(value, field)
    }

    pub fn email(value: &str, field: &str) -> Result<(), ValidationError> {
        IsEmail::validate(value, field)
    }

    pub fn phone(value: &str, field: &str) -> Result<(), ValidationError> {
        IsPhone::validate(value, field)
    }

    pub fn zip_code(value: &str, field: &str) -> Result<(), ValidationError> {
        IsZipCode::validate(value, field)
    }

    pub fn name(value: &str, field: &str) -> Result<(), ValidationError> {
        IsName::validate(value, field)
    }

    pub fn password(value: &str, field: &str) -> Result<(), ValidationError> {
        IsPassword::validate(value, field)
    }

    pub fn positive_integer(value: &str, field: &str) -> Result<(), ValidationError> {
        IsPositiveInteger::validate(value, field)
    }

    pub fn min_length(min: usize) -> impl Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync {
        move |value: &str, field: &str| MinLength(min).validate(value, field)
    }

    pub fn not_in_future(
        validator: FieldValidator,
    ) -> impl Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync {
        move |value: &str, field: &str| NotInFuture(&validator).validate(value, field)
    }

    pub fn in_future(
        validator: FieldValidator,
    ) -> impl Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync {
        move |value: &str, field: &str| InFuture(&validator).validate(value, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, NaiveZone};
    use chrono::{TimeZone, Utc};

    fn pinned() -> FieldValidator {
        FieldValidator::new()
            .with_clock(FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
            .with_naive_zone(NaiveZone::utc())
    }

    #[test]
    fn test_required() {
        assert!(Required::validate("x", "email").is_ok());
        let error = Required::validate("", "first_name").unwrap_err();
        assert_eq!(error.constraint, "required");
        assert_eq!(error.message, "First name is required.");
    }

    #[test]
    fn test_min_length_counts_like_a_browser() {
        let validator = MinLength(3);
        assert!(validator.validate("Abc", "hospital_name").is_ok());
        let error = validator.validate("Ab", "hospital_name").unwrap_err();
        assert_eq!(
            error.message,
            "Please enter a valid hospital name (min 3 characters)."
        );
        // One astral character is two UTF-16 units.
        assert!(MinLength(2).validate("😀", "x").is_ok());
    }

    #[test]
    fn test_email_and_phone_messages() {
        let error = IsEmail::validate("nope", "email").unwrap_err();
        assert_eq!(error.message, "Please enter a valid email address.");
        assert_eq!(error.value.as_deref(), Some("nope"));

        let error = IsPhone::validate("123", "phone").unwrap_err();
        assert_eq!(error.constraint, "isPhone");
        assert!(IsPhone::validate("(555) 010-0199", "phone").is_ok());
    }

    #[test]
    fn test_zip_code() {
        assert!(IsZipCode::validate("560001", "zip_code").is_ok());
        assert_eq!(
            IsZipCode::validate("56 0001", "zip_code").unwrap_err().constraint,
            "isZipCode"
        );
    }

    #[test]
    fn test_name_message_uses_label() {
        let error = IsName::validate("J", "last_name").unwrap_err();
        assert_eq!(
            error.message,
            "Last name should contain only letters and be at least 2 characters long."
        );
    }

    #[test]
    fn test_password_error_hides_value() {
        let error = IsPassword::validate("secret", "password").unwrap_err();
        assert_eq!(error.value, None);
        assert!(IsPassword::validate("longenough", "password").is_ok());
    }

    #[test]
    fn test_date_validators() {
        let validator = pinned();
        assert!(NotInFuture(&validator).validate("1990-01-01", "date_of_birth").is_ok());
        assert!(NotInFuture(&validator).validate("", "date_of_birth").is_ok());
        let error = NotInFuture(&validator)
            .validate("2030-01-01", "date_of_birth")
            .unwrap_err();
        assert_eq!(error.message, "Date of birth cannot be in the future.");

        assert!(InFuture(&validator).validate("2024-06-01", "event_date").is_ok());
        assert_eq!(
            InFuture(&validator)
                .validate("2024-01-01", "event_date")
                .unwrap_err()
                .constraint,
            "inFuture"
        );
    }

    #[test]
    fn test_positive_integer() {
        assert!(IsPositiveInteger::validate("3", "quantity").is_ok());
        let error = IsPositiveInteger::validate("2.5", "quantity").unwrap_err();
        assert_eq!(error.message, "Quantity must be a positive whole number.");
    }

    #[test]
    fn test_fields_match_and_differ() {
        assert!(FieldsMatch::validate("a", "a", "confirm_password").is_ok());
        assert_eq!(
            FieldsMatch::validate("a", "b", "confirm_password")
                .unwrap_err()
                .constraint,
            "matches"
        );

        assert!(FieldsDiffer::validate("1", "2", "emergency_contact_phone", "phone").is_ok());
        let error =
            FieldsDiffer::validate("1", "1", "emergency_contact_phone", "phone").unwrap_err();
        assert_eq!(
            error.message,
            "Emergency contact phone cannot be the same as phone."
        );
    }

    #[test]
    fn test_rule_closures() {
        let min = rule::min_length(2);
        assert!(min("ab", "x").is_ok());
        let future = rule::in_future(pinned());
        assert!(future("2099-01-01", "event_date").is_ok());
        assert!(rule::email("a@b.co", "email").is_ok());
    }
}
