//! Fuzz target for form submissions.
//!
//! Arbitrary bytes through the submission pipe must produce either a form
//! or an error body, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lifesaver_validation::*;

fn submit<T>(body: &[u8], validator: &FieldValidator)
where
    T: serde::de::DeserializeOwned + Validate,
{
    match FormPipe::parse_with::<T>(body, validator) {
        Ok(_) => {}
        Err(SubmissionError::Invalid(errors)) => {
            assert!(!errors.is_empty());
            if validator.is_fail_fast() {
                assert_eq!(errors.len(), 1);
            }
            let _ = FormPipe::error_body(&errors);
        }
        Err(error) => {
            let _ = error.to_json();
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&flag, body)) = data.split_first() else {
        return;
    };
    let validator = FieldValidator::new()
        .with_naive_zone(NaiveZone::utc())
        .fail_fast(flag & 1 == 1);

    submit::<LoginForm>(body, &validator);
    submit::<AccountRegistration>(body, &validator);
    submit::<HospitalRegistration>(body, &validator);
    submit::<SupplierRegistration>(body, &validator);
    submit::<OrganPledge>(body, &validator);
});
