// Validation rules builder for raw form data

use crate::{FieldValidator, Required, ValidationError};
use std::collections::HashMap;
use std::sync::Arc;

type ValidatorFn = Arc<dyn Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync>;

/// Rules for one form field.
///
/// ```
/// use lifesaver_validation::{ValidationRules, rule};
///
/// let zip = ValidationRules::for_field("zip_code").optional().add(rule::zip_code);
///
/// assert!(zip.validate("").is_ok());
/// assert!(zip.validate("560001").is_ok());
/// assert!(zip.validate("56-0001").is_err());
/// ```
#[derive(Clone)]
pub struct ValidationRules {
    validators: Vec<ValidatorFn>,
    field: String,
    optional: bool,
}

impl ValidationRules {
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            validators: Vec::new(),
            field: field.into(),
            optional: false,
        }
    }

    /// Skip every rule when the value is empty or missing.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Run every rule against `value`.
    pub fn validate(&self, value: &str) -> Result<(), Vec<ValidationError>> {
        let errors = self.collect(value, false);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn collect(&self, value: &str, fail_fast: bool) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.optional && value.is_empty() {
            return errors;
        }

        for validator in &self.validators {
            if let Err(error) = validator(value, &self.field) {
                errors.push(error);
                if fail_fast {
                    break;
                }
            }
        }
        errors
    }
}

impl std::fmt::Debug for ValidationRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRules")
            .field("field", &self.field)
            .field("optional", &self.optional)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Rules for a whole form, applied to `field -> value` data.
#[derive(Debug, Clone, Default)]
pub struct ValidationBuilder {
    rules: Vec<ValidationRules>,
    fail_fast: bool,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rules: ValidationRules) -> Self {
        self.rules.push(rules);
        self
    }

    /// Stop at the first failing rule across all fields.
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Take the fail-fast setting from a configured validator.
    pub fn using(self, validator: &FieldValidator) -> Self {
        self.fail_fast(validator.is_fail_fast())
    }

    /// Validate fields in declaration order. A missing key fails with
    /// `required` unless the field is optional.
    pub fn validate(&self, data: &HashMap<String, String>) -> Result<(), Vec<ValidationError>> {
        let mut all_errors = Vec::new();

        for rule in &self.rules {
            let errors = match data.get(rule.field()) {
                Some(value) => rule.collect(value, self.fail_fast),
                None if rule.is_optional() => Vec::new(),
                None => Required::validate("", rule.field()).err().into_iter().collect(),
            };

            all_errors.extend(errors);
            if self.fail_fast && !all_errors.is_empty() {
                all_errors.truncate(1);
                break;
            }
        }

        if all_errors.is_empty() {
            Ok(())
        } else {
            Err(all_errors)
        }
    }
}
