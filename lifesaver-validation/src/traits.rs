// Validation traits

use crate::{FieldValidator, ValidationError};

/// Types that can check themselves before submission.
pub trait Validate {
    /// Validate against an explicit validator (clock, zone, fail-fast).
    fn validate_with(&self, validator: &FieldValidator) -> Result<(), Vec<ValidationError>>;

    /// Validate with the system clock and host local zone.
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        self.validate_with(&FieldValidator::default())
    }
}

/// Ordered list of checks for one submission.
///
/// Each check runs only while the collector is still open: in fail-fast
/// mode the first error closes it, so later checks never execute.
pub struct Checks<'v> {
    validator: &'v FieldValidator,
    errors: Vec<ValidationError>,
}

impl<'v> Checks<'v> {
    pub fn new(validator: &'v FieldValidator) -> Self {
        Self {
            validator,
            errors: Vec::new(),
        }
    }

    pub fn validator(&self) -> &'v FieldValidator {
        self.validator
    }

    fn is_closed(&self) -> bool {
        self.validator.is_fail_fast() && !self.errors.is_empty()
    }

    /// Run a check.
    pub fn check<F>(&mut self, check: F) -> &mut Self
    where
        F: FnOnce(&FieldValidator) -> Result<(), ValidationError>,
    {
        if !self.is_closed() {
            if let Err(error) = check(self.validator) {
                self.errors.push(error);
            }
        }
        self
    }

    /// Run a check only when `condition` holds (optional fields).
    pub fn check_if<F>(&mut self, condition: bool, check: F) -> &mut Self
    where
        F: FnOnce(&FieldValidator) -> Result<(), ValidationError>,
    {
        if condition {
            self.check(check);
        }
        self
    }

    /// Run several checks that each report their own field.
    pub fn check_all<F>(&mut self, check: F) -> &mut Self
    where
        F: FnOnce(&FieldValidator) -> Vec<ValidationError>,
    {
        if !self.is_closed() {
            let mut found = check(self.validator);
            if self.validator.is_fail_fast() {
                found.truncate(1);
            }
            self.errors.append(&mut found);
        }
        self
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn finish(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
