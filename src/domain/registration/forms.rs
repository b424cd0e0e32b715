//! Registration form payloads and their validation
//!
//! Form validation collects every failure across all fields into one
//! field-to-messages map instead of stopping at the first, so a client can
//! render the whole form's problems in one round trip. Uniqueness of
//! email, phone, CURP, RFC and institution name is deliberately not checked
//! here; the store owns that and reports duplicates separately.

use serde::Deserialize;

use crate::domain::error::{DomainError, FieldErrors};
use crate::domain::profile::PersonKind;
use crate::domain::validation::{
    validate_curp, validate_email, validate_no_digits, validate_password_strength, validate_phone,
    validate_rfc,
};

/// Phone length bounds; digits-only is the validator's concern
pub const MIN_PHONE_LENGTH: usize = 7;
pub const MAX_PHONE_LENGTH: usize = 20;

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

/// Record a required-field failure and report whether the value is usable
fn require(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        push(errors, field, "This field is required");
        return false;
    }
    true
}

fn check_name(errors: &mut FieldErrors, field: &str, value: &str) {
    if require(errors, field, value) {
        if let Err(e) = validate_no_digits(value) {
            push(errors, field, e.to_string());
        }
    }
}

fn check_phone(errors: &mut FieldErrors, value: &str) {
    if let Err(e) = validate_phone(value) {
        push(errors, "phone", e.to_string());
        return;
    }
    if value.len() < MIN_PHONE_LENGTH || value.len() > MAX_PHONE_LENGTH {
        push(
            errors,
            "phone",
            format!("Phone number must be between {MIN_PHONE_LENGTH} and {MAX_PHONE_LENGTH} digits"),
        );
    }
}

fn check_email(errors: &mut FieldErrors, value: &str) {
    if require(errors, "email", value) {
        if let Err(e) = validate_email(value) {
            push(errors, "email", e.to_string());
        }
    }
}

fn check_passwords(errors: &mut FieldErrors, password: &str, confirm: &str) {
    if let Err(weaknesses) = validate_password_strength(password) {
        for weakness in weaknesses {
            push(errors, "password", weakness.to_string());
        }
    }
    if password != confirm {
        push(errors, "password_confirm", "Passwords do not match");
    }
}

/// Person registration payload (donee or donor)
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRegistrationForm {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub first_surname: String,
    pub second_surname: String,
    pub curp: String,
    pub city: String,
    pub state: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirm: String,
    /// Which person table receives the profile: "donee" or "donor"
    pub user_type: String,
}

/// Person registration that has passed field validation
#[derive(Debug, Clone)]
pub struct ValidPersonRegistration {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub first_surname: String,
    pub second_surname: String,
    pub curp: String,
    pub city: String,
    pub state: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub kind: PersonKind,
}

impl PersonRegistrationForm {
    /// Validate every field, collecting all failures
    pub fn validate(self) -> Result<ValidPersonRegistration, DomainError> {
        let mut errors = FieldErrors::new();

        check_name(&mut errors, "first_name", &self.first_name);
        check_name(&mut errors, "first_surname", &self.first_surname);
        check_name(&mut errors, "second_surname", &self.second_surname);

        // Blank middle names collapse to none
        let middle_name = self
            .middle_name
            .clone()
            .filter(|name| !name.trim().is_empty());
        if let Some(name) = &middle_name {
            if let Err(e) = validate_no_digits(name) {
                push(&mut errors, "middle_name", e.to_string());
            }
        }

        if require(&mut errors, "curp", &self.curp) {
            if let Err(e) = validate_curp(&self.curp) {
                push(&mut errors, "curp", e.to_string());
            }
        }

        require(&mut errors, "city", &self.city);
        require(&mut errors, "state", &self.state);
        check_email(&mut errors, &self.email);
        check_phone(&mut errors, &self.phone);
        check_passwords(&mut errors, &self.password, &self.password_confirm);

        let kind = match PersonKind::parse(&self.user_type) {
            Ok(kind) => Some(kind),
            Err(_) => {
                push(&mut errors, "user_type", "Must be 'donee' or 'donor'");
                None
            }
        };

        match (errors.is_empty(), kind) {
            (true, Some(kind)) => Ok(ValidPersonRegistration {
                first_name: self.first_name,
                middle_name,
                first_surname: self.first_surname,
                second_surname: self.second_surname,
                curp: self.curp,
                city: self.city,
                state: self.state,
                email: self.email,
                phone: self.phone,
                password: self.password,
                kind,
            }),
            _ => Err(DomainError::invalid_form(errors)),
        }
    }
}

/// Institution registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionRegistrationForm {
    pub name: String,
    pub rfc: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirm: String,
}

/// Institution registration that has passed field validation
#[derive(Debug, Clone)]
pub struct ValidInstitutionRegistration {
    pub name: String,
    pub rfc: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl InstitutionRegistrationForm {
    /// Validate every field, collecting all failures
    pub fn validate(self) -> Result<ValidInstitutionRegistration, DomainError> {
        let mut errors = FieldErrors::new();

        require(&mut errors, "name", &self.name);

        if require(&mut errors, "rfc", &self.rfc) {
            if let Err(e) = validate_rfc(&self.rfc) {
                push(&mut errors, "rfc", e.to_string());
            }
        }

        require(&mut errors, "city", &self.city);
        require(&mut errors, "state", &self.state);
        require(&mut errors, "address", &self.address);
        check_email(&mut errors, &self.email);
        check_phone(&mut errors, &self.phone);
        check_passwords(&mut errors, &self.password, &self.password_confirm);

        if errors.is_empty() {
            Ok(ValidInstitutionRegistration {
                name: self.name,
                rfc: self.rfc,
                city: self.city,
                state: self.state,
                address: self.address,
                email: self.email,
                phone: self.phone,
                password: self.password,
            })
        } else {
            Err(DomainError::invalid_form(errors))
        }
    }
}
