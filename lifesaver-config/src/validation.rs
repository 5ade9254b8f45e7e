// Settings validation

use crate::{ConfigError, Result};
use std::fmt::Display;
use std::str::FromStr;

/// Settings that can check their own values after loading.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Checks shared by settings sections.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Value must lie in `min..=max`.
    pub fn in_range<T: PartialOrd + Display>(value: T, min: T, max: T, field: &str) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                field, min, max, value
            )));
        }
        Ok(())
    }

    /// Value must parse as `T`.
    pub fn parses<T>(value: &str, field: &str) -> Result<()>
    where
        T: FromStr,
        T::Err: Display,
    {
        value
            .parse::<T>()
            .map(|_| ())
            .map_err(|e| ConfigError::ValidationError(format!("{}: {}", field, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifesaver_log::Level;

    #[test]
    fn test_range_validation() {
        assert!(ConfigValidator::in_range(5, 1, 10, "field").is_ok());
        assert!(ConfigValidator::in_range(0, 1, 10, "field").is_err());

        let message = ConfigValidator::in_range(11, 1, 10, "field")
            .unwrap_err()
            .to_string();
        assert_eq!(message, "Invalid setting: field must be between 1 and 10, got 11");
    }

    #[test]
    fn test_parses() {
        assert!(ConfigValidator::parses::<Level>("warn", "log.level").is_ok());
        assert!(ConfigValidator::parses::<Level>("loud", "log.level").is_err());
    }
}
