use std::collections::BTreeMap;

use thiserror::Error;

/// Field name to accumulated error messages, ordered for stable serialization.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: FieldErrors,
    },

    #[error("Duplicate {field}: {message}")]
    Duplicate { field: String, message: String },

    #[error("Incomplete profile: {message}")]
    IncompleteProfile { message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Validation failure carrying per-field messages from a form.
    pub fn invalid_form(fields: FieldErrors) -> Self {
        Self::Validation {
            message: "one or more fields failed validation".to_string(),
            fields,
        }
    }

    pub fn duplicate(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Duplicate {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn incomplete_profile() -> Self {
        Self::IncompleteProfile {
            message: "account has no donee, donor or institution profile".to_string(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("post 'abc' not found");
        assert_eq!(error.to_string(), "Not found: post 'abc' not found");
    }

    #[test]
    fn test_duplicate_error_names_field() {
        let error = DomainError::duplicate("email", "email is already registered");
        assert_eq!(
            error.to_string(),
            "Duplicate email: email is already registered"
        );
    }

    #[test]
    fn test_invalid_form_keeps_field_messages() {
        let mut fields = FieldErrors::new();
        fields
            .entry("curp".to_string())
            .or_default()
            .push("CURP format is invalid".to_string());

        match DomainError::invalid_form(fields) {
            DomainError::Validation { fields, .. } => {
                assert_eq!(fields["curp"], vec!["CURP format is invalid"]);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        let error = DomainError::invalid_credentials();
        assert_eq!(error.to_string(), "Invalid credentials");
    }
}
