//! Field validation for LifeSaver Connect
//!
//! Eight total predicates check the values people type into the donor,
//! hospital and supplier screens: email, phone, zip code, name, password,
//! two date checks and a positive-integer check. Every predicate accepts any
//! [`FieldValue`], coerces it the way a browser would, and answers a plain
//! `bool`. Nothing here panics on user input.
//!
//! On top of the predicates sit error-producing validators, a rules builder
//! for loosely typed data, and the platform's submission forms.
//!
//! # Examples
//!
//! ## Predicates
//!
//! ```
//! use lifesaver_validation::{validate_email, validate_phone, validate_positive_integer};
//!
//! assert!(validate_email("donor@example.com"));
//! assert!(!validate_email("donor@example"));
//! assert!(validate_phone("+1 (555) 010-0199"));
//! assert!(validate_positive_integer("42"));
//! assert!(!validate_positive_integer(2.5));
//! ```
//!
//! ## Pinned clock
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use lifesaver_validation::{FieldValidator, FixedClock};
//!
//! let validator = FieldValidator::new()
//!     .with_clock(FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()));
//!
//! assert!(validator.validate_date_not_in_future("2024-04-30T23:59:59Z"));
//! assert!(validator.validate_date_in_future("2024-05-02T00:00:00Z"));
//! // Empty input is "not provided" and passes.
//! assert!(validator.validate_date_in_future(""));
//! ```
//!
//! ## Forms
//!
//! ```
//! use lifesaver_validation::{FormPipe, SupplierRegistration};
//!
//! let body = br#"{
//!     "company_name": "MedSupply Co",
//!     "contact_person": "Anil",
//!     "email": "sales@medsupply.com",
//!     "phone": "9845012345"
//! }"#;
//!
//! let form: SupplierRegistration = FormPipe::parse(body).unwrap();
//! assert_eq!(form.business_type, "SUPPLIER");
//! ```
//!
//! ## Validation Rules Builder
//!
//! ```
//! use lifesaver_validation::{ValidationBuilder, ValidationRules, rule};
//! use std::collections::HashMap;
//!
//! let form = ValidationBuilder::new()
//!     .field(ValidationRules::for_field("first_name").add(rule::required).add(rule::name))
//!     .field(ValidationRules::for_field("zip_code").optional().add(rule::zip_code));
//!
//! let mut data = HashMap::new();
//! data.insert("first_name".to_string(), "Asha".to_string());
//! assert!(form.validate(&data).is_ok());
//! ```

mod clock;
mod dates;
mod errors;
mod forms;
mod pipe;
mod predicates;
mod rules;
mod traits;
mod validators;
mod value;

pub use clock::*;
pub use dates::{NaiveZone, moment_of, parse_moment};
pub use errors::*;
pub use forms::*;
pub use pipe::*;
pub use predicates::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;
pub use value::*;
