//! Registration domain
//!
//! Typed form payloads and the validate-everything-at-once rules they obey.
//! The orchestration (hashing, normalization, atomic writes) lives in the
//! infrastructure registration service.

mod forms;

pub use forms::{
    InstitutionRegistrationForm, PersonRegistrationForm, ValidInstitutionRegistration,
    ValidPersonRegistration, MAX_PHONE_LENGTH, MIN_PHONE_LENGTH,
};
