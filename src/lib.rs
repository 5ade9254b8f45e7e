// LifeSaver Connect - form and field validation for the donation platform
//
// Re-exports the validation, logging and settings crates under one name.

pub use lifesaver_log;
pub use lifesaver_validation::*;

#[cfg(feature = "config")]
pub use lifesaver_config;

/// Load settings from `.env` and `LIFESAVER_*` variables, apply the log
/// settings, and return the configured validator.
#[cfg(feature = "config")]
pub fn bootstrap() -> lifesaver_config::Result<FieldValidator> {
    lifesaver_log::init();
    let settings = lifesaver_config::Settings::from_env()?;
    let validator = settings.install()?;
    lifesaver_log::debug!(
        target: "lifesaver",
        "Validator ready (fail_fast={}, naive_zone={:?})",
        validator.is_fail_fast(),
        validator.naive_zone()
    );
    Ok(validator)
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        AccountRegistration,
        Clock,
        FieldValidator,
        FieldValue,
        FixedClock,
        FormPipe,
        HospitalRegistration,
        LoginForm,
        NaiveZone,
        OrganPledge,
        SubmissionError,
        SupplierRegistration,
        SystemClock,
        Validate,
        ValidationError,
        ValidationErrors,
        validate_date_in_future,
        validate_date_not_in_future,
        validate_email,
        validate_name,
        validate_password,
        validate_phone,
        validate_positive_integer,
        validate_zip_code,
    };

    #[cfg(feature = "config")]
    pub use lifesaver_config::{Settings, SettingsLoader};
}
