//! Submission forms
//!
//! Each form checks its fields in the order the corresponding screen does,
//! so the first error is always the message that screen would show. With a
//! fail-fast validator only that first error is returned.

use crate::validators::{
    FieldsDiffer, FieldsMatch, IsEmail, IsName, IsPassword, IsPhone, IsZipCode, MinLength,
    NotInFuture, Required,
};
use crate::{Checks, FieldValidator, Validate, ValidationError};
use lifesaver_log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "[redacted]";

const ADMIN_NAME_MESSAGE: &str =
    "Administrator names should contain only letters and be at least 2 characters long.";

/// Close out a form's checks, logging failing fields (never values).
fn finish(form: &str, checks: Checks<'_>) -> Result<(), Vec<ValidationError>> {
    let result = checks.finish();
    if let Err(errors) = &result {
        let failed: Vec<String> = errors
            .iter()
            .map(|e| format!("{}:{}", e.field, e.constraint))
            .collect();
        debug!(
            target: "lifesaver::forms",
            "{} rejected with {} error(s): {}",
            form,
            errors.len(),
            failed.join(", ")
        );
    }
    result
}

// ============================================================================
// Login
// ============================================================================

/// Sign-in screen.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Area of the platform to enter (donor, hospital, medical_essential)
    pub module: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("module", &self.module)
            .finish()
    }
}

impl Validate for LoginForm {
    fn validate_with(&self, validator: &FieldValidator) -> Result<(), Vec<ValidationError>> {
        let both = "Please enter both email and password.";
        let mut checks = Checks::new(validator);
        checks
            .check(|_| Required::validate(&self.email, "email").map_err(|e| e.with_message(both)))
            .check(|_| {
                Required::validate(&self.password, "password").map_err(|e| e.with_message(both))
            })
            .check_if(!self.email.is_empty(), |_| IsEmail::validate(&self.email, "email"))
            .check(|_| {
                Required::validate(&self.module, "module")
                    .map_err(|e| e.with_message("Please select which module you want to access."))
            });
        finish("login", checks)
    }
}

// ============================================================================
// Account registration
// ============================================================================

/// Donor account sign-up.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub blood_group: String,
    pub gender: String,
    pub phone: String,
    pub donor_module: String,
}

impl fmt::Debug for AccountRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRegistration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("confirm_password", &REDACTED)
            .field("blood_group", &self.blood_group)
            .field("gender", &self.gender)
            .field("phone", &self.phone)
            .field("donor_module", &self.donor_module)
            .finish()
    }
}

impl Validate for AccountRegistration {
    fn validate_with(&self, validator: &FieldValidator) -> Result<(), Vec<ValidationError>> {
        let required = [
            ("email", &self.email),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("donor_module", &self.donor_module),
            ("phone", &self.phone),
        ];

        let mut checks = Checks::new(validator);
        checks
            .check_all(|_| {
                required
                    .iter()
                    .filter_map(|(field, value)| {
                        Required::validate(value, field)
                            .err()
                            .map(|e| e.with_message("Please fill in all required fields."))
                    })
                    .collect()
            })
            .check_if(!self.first_name.is_empty(), |_| IsName::validate(&self.first_name, "first_name"))
            .check_if(!self.last_name.is_empty(), |_| IsName::validate(&self.last_name, "last_name"))
            .check_if(!self.email.is_empty(), |_| IsEmail::validate(&self.email, "email"))
            .check(|_| IsPassword::validate(&self.password, "password"))
            .check(|_| {
                FieldsMatch::validate(&self.confirm_password, &self.password, "confirm_password")
                    .map_err(|e| e.with_message("Passwords do not match."))
            })
            .check_if(!self.phone.is_empty(), |_| IsPhone::validate(&self.phone, "phone"));
        finish("account_registration", checks)
    }
}

// ============================================================================
// Hospital registration
// ============================================================================

/// Hospital onboarding: the institution plus its administrator account.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalRegistration {
    #[serde(alias = "hospitalName")]
    pub hospital_name: String,
    #[serde(alias = "hospitalType")]
    pub hospital_type: String,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(alias = "confirmPassword")]
    pub confirm_password: String,
    pub city: String,
    #[serde(alias = "zipCode")]
    pub zip_code: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for HospitalRegistration {
    fn default() -> Self {
        Self {
            hospital_name: String::new(),
            hospital_type: "HOSPITAL".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            username: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            city: String::new(),
            zip_code: String::new(),
            address: String::new(),
            phone: String::new(),
            website: String::new(),
            latitude: None,
            longitude: None,
        }
    }
}

impl HospitalRegistration {
    /// Account username: the one given, or the local part of the email.
    pub fn effective_username(&self) -> &str {
        if self.username.is_empty() {
            self.email.split('@').next().unwrap_or_default()
        } else {
            &self.username
        }
    }
}

impl fmt::Debug for HospitalRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HospitalRegistration")
            .field("hospital_name", &self.hospital_name)
            .field("hospital_type", &self.hospital_type)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("confirm_password", &REDACTED)
            .field("city", &self.city)
            .field("zip_code", &self.zip_code)
            .field("address", &self.address)
            .field("phone", &self.phone)
            .field("website", &self.website)
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .finish()
    }
}

impl Validate for HospitalRegistration {
    fn validate_with(&self, validator: &FieldValidator) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::new(validator);
        checks
            .check(|_| MinLength(3).validate(&self.hospital_name, "hospital_name"))
            .check_all(|_| {
                [
                    IsName::validate(&self.first_name, "first_name"),
                    IsName::validate(&self.last_name, "last_name"),
                ]
                .into_iter()
                .filter_map(Result::err)
                .map(|e| e.with_message(ADMIN_NAME_MESSAGE))
                .collect()
            })
            .check(|_| IsEmail::validate(&self.email, "email"))
            .check(|_| IsPhone::validate(&self.phone, "phone"))
            .check_if(!self.zip_code.is_empty(), |_| IsZipCode::validate(&self.zip_code, "zip_code"))
            .check(|_| IsPassword::validate(&self.password, "password"))
            .check(|_| {
                FieldsMatch::validate(&self.confirm_password, &self.password, "confirm_password")
                    .map_err(|e| e.with_message("Passwords do not match."))
            });
        finish("hospital_registration", checks)
    }
}

// ============================================================================
// Medical-essential supplier registration
// ============================================================================

/// Supplier profile for the medical-essentials marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierRegistration {
    pub company_name: String,
    pub business_type: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub license_number: String,
    pub tax_id: String,
}

impl Default for SupplierRegistration {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            business_type: "SUPPLIER".to_string(),
            contact_person: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            zip_code: String::new(),
            license_number: String::new(),
            tax_id: String::new(),
        }
    }
}

impl Validate for SupplierRegistration {
    fn validate_with(&self, validator: &FieldValidator) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::new(validator);
        checks
            .check(|_| MinLength(3).validate(&self.company_name, "company_name"))
            .check(|_| {
                MinLength(2)
                    .validate(&self.contact_person, "contact_person")
                    .map_err(|e| e.with_message("Please enter a valid contact person name."))
            })
            .check(|_| IsEmail::validate(&self.email, "email"))
            .check(|_| IsPhone::validate(&self.phone, "phone"))
            .check_if(!self.zip_code.is_empty(), |_| IsZipCode::validate(&self.zip_code, "zip_code"));
        finish("supplier_registration", checks)
    }
}

// ============================================================================
// Organ pledge
// ============================================================================

/// Organ-donation pledge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganPledge {
    pub organs_to_donate: Vec<String>,
    pub post_mortem_consent: bool,
    pub acknowledgement: bool,
    pub family_responsibility: bool,
    pub living_kidney_donation: bool,
    pub medical_student_donation: bool,
    #[serde(alias = "selected_hospital_ids")]
    pub selected_hospitals: Vec<u64>,
    pub date_of_birth: Option<String>,
    pub blood_group: String,
    pub phone: String,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: String,
}

impl OrganPledge {
    /// Whether every organ is pledged.
    pub fn pledges_all_organs(&self) -> bool {
        self.organs_to_donate.iter().any(|organ| organ == "ALL")
    }
}

impl Validate for OrganPledge {
    fn validate_with(&self, validator: &FieldValidator) -> Result<(), Vec<ValidationError>> {
        let consent =
            "Please accept the post-mortem consent and general acknowledgement to proceed.";
        let date_of_birth = self.date_of_birth.as_deref().unwrap_or_default();

        let mut checks = Checks::new(validator);
        checks
            .check_all(|_| {
                [
                    ("post_mortem_consent", self.post_mortem_consent),
                    ("acknowledgement", self.acknowledgement),
                ]
                .into_iter()
                .filter(|(_, given)| !given)
                .map(|(field, _)| ValidationError::new(field, consent).with_constraint("consent"))
                .collect()
            })
            .check(|_| {
                if self.organs_to_donate.is_empty() {
                    Err(
                        ValidationError::new("organs_to_donate", "Please select at least one organ to donate.")
                            .with_constraint("minItems"),
                    )
                } else {
                    Ok(())
                }
            })
            .check_if(!self.phone.is_empty(), |_| IsPhone::validate(&self.phone, "phone"))
            .check_if(!date_of_birth.is_empty(), |v| {
                NotInFuture(v).validate(date_of_birth, "date_of_birth")
            })
            .check_if(!self.emergency_contact_phone.is_empty(), |_| {
                IsPhone::validate(&self.emergency_contact_phone, "emergency_contact_phone").map_err(
                    |e| {
                        e.with_message(
                            "Please enter a valid 10-15 digit phone number for the emergency contact.",
                        )
                    },
                )
            })
            .check_if(
                !self.phone.is_empty() && !self.emergency_contact_phone.is_empty(),
                |_| {
                    FieldsDiffer::validate(
                        &self.emergency_contact_phone,
                        &self.phone,
                        "emergency_contact_phone",
                        "phone",
                    )
                    .map_err(|e| {
                        e.with_message(
                            "Emergency contact number cannot be the same as your phone number.",
                        )
                    })
                },
            );
        finish("organ_pledge", checks)
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

    fn constraints(errors: &[ValidationError]) -> Vec<(&str, &str)> {
        errors
            .iter()
            .map(|e| (e.field.as_str(), e.constraint.as_str()))
            .collect()
    }

    fn registration() -> AccountRegistration {
        AccountRegistration {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@example.com".into(),
            password: "donate-blood".into(),
            confirm_password: "donate-blood".into(),
            blood_group: "O+".into(),
            gender: "F".into(),
            phone: "+91 98450 12345".into(),
            donor_module: "donor".into(),
        }
    }

    #[test]
    fn test_login() {
        let form = LoginForm {
            email: "donor@example.com".into(),
            password: "whatever".into(),
            module: "donor".into(),
        };
        assert!(form.validate().is_ok());

        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(
            constraints(&errors),
            vec![("email", "required"), ("password", "required"), ("module", "required")]
        );
        assert_eq!(errors[0].message, "Please enter both email and password.");
    }

    #[test]
    fn test_login_bad_email() {
        let form = LoginForm {
            email: "donor".into(),
            password: "x".into(),
            module: "donor".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(constraints(&errors), vec![("email", "isEmail")]);
    }

    #[test]
    fn test_registration_valid() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_registration_error_order() {
        let form = AccountRegistration {
            first_name: "A1".into(),
            email: "nope".into(),
            password: "short".into(),
            confirm_password: "other".into(),
            phone: "123".into(),
            ..registration()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(
            constraints(&errors),
            vec![
                ("first_name", "isName"),
                ("email", "isEmail"),
                ("password", "isPassword"),
                ("confirm_password", "matches"),
                ("phone", "isPhone"),
            ]
        );
        assert_eq!(errors[3].message, "Passwords do not match.");
    }

    #[test]
    fn test_registration_missing_fields_fail_fast() {
        let form = AccountRegistration {
            phone: String::new(),
            email: String::new(),
            ..registration()
        };
        let errors = form.validate_with(&pinned().fail_fast(true)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Please fill in all required fields.");
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_registration_debug_redacts_passwords() {
        let rendered = format!("{:?}", registration());
        assert!(!rendered.contains("donate-blood"));
        assert!(rendered.contains(REDACTED));
    }

    fn hospital() -> HospitalRegistration {
        HospitalRegistration {
            hospital_name: "City General".into(),
            first_name: "Meera".into(),
            last_name: "Iyer".into(),
            email: "admin@citygeneral.org".into(),
            password: "hospital-pass".into(),
            confirm_password: "hospital-pass".into(),
            phone: "080-2222-3333".into(),
            ..HospitalRegistration::default()
        }
    }

    #[test]
    fn test_hospital_valid_without_zip() {
        assert!(hospital().validate().is_ok());
        assert_eq!(hospital().hospital_type, "HOSPITAL");
    }

    #[test]
    fn test_hospital_checks() {
        let form = HospitalRegistration {
            hospital_name: "CG".into(),
            last_name: "X".into(),
            zip_code: "5600".into(),
            ..hospital()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            constraints(&errors),
            vec![
                ("hospital_name", "minLength"),
                ("last_name", "isName"),
                ("zip_code", "isZipCode"),
            ]
        );
        assert_eq!(
            errors[0].message,
            "Please enter a valid hospital name (min 3 characters)."
        );
        assert_eq!(
            errors[1].message,
            "Administrator names should contain only letters and be at least 2 characters long."
        );
    }

    #[test]
    fn test_hospital_admin_names_share_a_message() {
        let form = HospitalRegistration {
            first_name: "M1".into(),
            last_name: "Q".into(),
            ..hospital()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            constraints(&errors),
            vec![("first_name", "isName"), ("last_name", "isName")]
        );
        for error in &errors {
            assert_eq!(
                error.message,
                "Administrator names should contain only letters and be at least 2 characters long."
            );
        }
    }

    #[test]
    fn test_hospital_accepts_camel_case_payload() {
        let form: HospitalRegistration = serde_json::from_value(serde_json::json!({
            "hospitalName": "Sunrise Clinic",
            "firstName": "Ravi",
            "lastName": "Kumar",
            "email": "ravi@sunrise.in",
            "password": "12345678",
            "confirmPassword": "12345678",
            "phone": "9845012345",
            "zipCode": "560001"
        }))
        .unwrap();

        assert_eq!(form.hospital_name, "Sunrise Clinic");
        assert!(form.validate().is_ok());
        assert_eq!(form.effective_username(), "ravi");
    }

    #[test]
    fn test_supplier() {
        let form = SupplierRegistration {
            company_name: "MedSupply Co".into(),
            contact_person: "Anil".into(),
            email: "sales@medsupply.com".into(),
            phone: "9845012345".into(),
            ..SupplierRegistration::default()
        };
        assert!(form.validate().is_ok());

        let errors = SupplierRegistration {
            contact_person: "A".into(),
            zip_code: "abcde".into(),
            ..form
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            constraints(&errors),
            vec![("contact_person", "minLength"), ("zip_code", "isZipCode")]
        );
        assert_eq!(errors[0].message, "Please enter a valid contact person name.");
    }

    fn pledge() -> OrganPledge {
        OrganPledge {
            organs_to_donate: vec!["KIDNEY".into(), "CORNEA".into()],
            post_mortem_consent: true,
            acknowledgement: true,
            date_of_birth: Some("1990-04-12".into()),
            phone: "9845012345".into(),
            emergency_contact_phone: "9845054321".into(),
            ..OrganPledge::default()
        }
    }

    #[test]
    fn test_pledge_valid() {
        assert!(pledge().validate_with(&pinned()).is_ok());
        assert!(!pledge().pledges_all_organs());
    }

    #[test]
    fn test_pledge_optional_fields_may_be_empty() {
        let form = OrganPledge {
            date_of_birth: None,
            phone: String::new(),
            emergency_contact_phone: String::new(),
            ..pledge()
        };
        assert!(form.validate_with(&pinned()).is_ok());
    }

    #[test]
    fn test_pledge_failures_in_order() {
        let form = OrganPledge {
            organs_to_donate: Vec::new(),
            acknowledgement: false,
            date_of_birth: Some("2030-01-01".into()),
            emergency_contact_phone: "9845012345".into(),
            ..pledge()
        };
        let errors = form.validate_with(&pinned()).unwrap_err();
        assert_eq!(
            constraints(&errors),
            vec![
                ("acknowledgement", "consent"),
                ("organs_to_donate", "minItems"),
                ("date_of_birth", "notInFuture"),
                ("emergency_contact_phone", "differs"),
            ]
        );
        assert_eq!(errors[2].message, "Date of birth cannot be in the future.");
        assert_eq!(
            errors[3].message,
            "Emergency contact number cannot be the same as your phone number."
        );
    }

    #[test]
    fn test_pledge_unparseable_birth_date_is_rejected() {
        let form = OrganPledge {
            date_of_birth: Some("12th of never".into()),
            ..pledge()
        };
        let errors = form.validate_with(&pinned()).unwrap_err();
        assert_eq!(constraints(&errors), vec![("date_of_birth", "notInFuture")]);
    }

    #[test]
    fn test_pledge_from_json_payload() {
        let form: OrganPledge = serde_json::from_str(
            r#"{
                "organs_to_donate": ["ALL"],
                "post_mortem_consent": true,
                "acknowledgement": true,
                "selected_hospital_ids": [3, 7],
                "date_of_birth": null
            }"#,
        )
        .unwrap();

        assert!(form.pledges_all_organs());
        assert_eq!(form.selected_hospitals, vec![3, 7]);
        assert!(form.validate_with(&pinned()).is_ok());
    }
}
