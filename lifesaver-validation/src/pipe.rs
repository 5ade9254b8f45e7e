// Submission pipe: JSON body in, validated form out

use crate::{FieldValidator, Validate, ValidationErrors};
use lifesaver_log::debug;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why a submission was turned away.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Validation failed:\n{0}")]
    Invalid(ValidationErrors),
}

impl SubmissionError {
    /// Validation errors, if the body parsed but did not validate.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::InvalidJson(_) => None,
        }
    }

    /// JSON body to send back to the client.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Invalid(errors) => FormPipe::error_body(errors),
            Self::InvalidJson(e) => serde_json::json!({
                "errors": [{
                    "field": "",
                    "message": format!("Invalid JSON: {}", e),
                    "constraint": "json",
                }]
            }),
        }
    }
}

/// Parses and validates submitted forms.
pub struct FormPipe;

impl FormPipe {
    /// Parse `body` as `T` and validate it with the system clock.
    pub fn parse<T>(body: &[u8]) -> Result<T, SubmissionError>
    where
        T: DeserializeOwned + Validate,
    {
        Self::parse_with(body, &FieldValidator::default())
    }

    /// Parse `body` as `T` and validate it with `validator`.
    pub fn parse_with<T>(body: &[u8], validator: &FieldValidator) -> Result<T, SubmissionError>
    where
        T: DeserializeOwned + Validate,
    {
        let parsed: T = serde_json::from_slice(body).map_err(|e| {
            debug!(target: "lifesaver::pipe", "Rejected malformed submission: {}", e);
            e
        })?;

        parsed
            .validate_with(validator)
            .map_err(|errors| SubmissionError::Invalid(errors.into()))?;

        Ok(parsed)
    }

    /// `{"errors": [...]}` body for a rejected submission.
    pub fn error_body(errors: &ValidationErrors) -> serde_json::Value {
        errors.to_json()
    }
}
