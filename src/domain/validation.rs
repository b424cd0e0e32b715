//! Field validators shared by the registration forms
//!
//! Validators are pure: no store access, no normalization side effects.
//! Case-insensitive identifiers (CURP, RFC) are uppercased before matching,
//! while persistence of the uppercased value is the orchestrator's job.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Canonical CURP pattern: 18 positional characters with the official
/// two-letter state-code list. A client-side variant admitting Ñ exists in
/// the wild and is intentionally not honored here.
static CURP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Z]{1}[AEIOU]{1}[A-Z]{2}[0-9]{2}(0[1-9]|1[0-2])(0[1-9]|[12][0-9]|3[01])[HM]{1}(AS|BC|BS|CC|CS|CH|CL|CM|DF|DG|GT|GR|HG|JC|MC|MN|MS|NT|NL|OC|PL|QT|QR|SP|SL|SR|TC|TS|TL|VZ|YN|ZS){1}[B-DF-HJ-NP-TV-Z]{3}[A-Z0-9]{1}[0-9]{1}$",
    )
    .unwrap()
});

/// RFC pattern: 3-4 letters (Ñ and & allowed), birth date, 3-char homoclave.
static RFC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z&Ñ]{3,4}[0-9]{2}(0[1-9]|1[0-2])(0[1-9]|[12][0-9]|3[01])[A-Z0-9]{3}$")
        .unwrap()
});

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Errors produced by the single-field validators
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldValidationError {
    #[error("Must not contain digits")]
    ContainsDigit,

    #[error("Phone number must contain digits only")]
    InvalidPhone,

    #[error("CURP format is invalid")]
    InvalidCurp,

    #[error("RFC format is invalid")]
    InvalidRfc,

    #[error("Email address is invalid")]
    InvalidEmail,
}

/// Password weaknesses, accumulated rather than short-circuited
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PasswordWeakness {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),

    #[error("Password must contain at least one uppercase letter")]
    NoUppercase,

    #[error("Password must contain at least one digit")]
    NoDigit,
}

/// Reject any value containing a decimal digit (person name fields).
///
/// An empty value passes: required-ness is the form's concern.
pub fn validate_no_digits(value: &str) -> Result<(), FieldValidationError> {
    if value.chars().any(|c| c.is_numeric()) {
        return Err(FieldValidationError::ContainsDigit);
    }

    Ok(())
}

/// Reject any value that is not entirely decimal digits.
///
/// An empty value fails (there is nothing digit-like about it); length
/// bounds are the form's concern.
pub fn validate_phone(value: &str) -> Result<(), FieldValidationError> {
    if value.is_empty() || value.chars().any(|c| !c.is_ascii_digit()) {
        return Err(FieldValidationError::InvalidPhone);
    }

    Ok(())
}

/// Match the canonical 18-character CURP pattern, case-insensitively.
pub fn validate_curp(value: &str) -> Result<(), FieldValidationError> {
    if !CURP_PATTERN.is_match(&value.to_uppercase()) {
        return Err(FieldValidationError::InvalidCurp);
    }

    Ok(())
}

/// Match the 12-13 character RFC pattern, case-insensitively.
pub fn validate_rfc(value: &str) -> Result<(), FieldValidationError> {
    if !RFC_PATTERN.is_match(&value.to_uppercase()) {
        return Err(FieldValidationError::InvalidRfc);
    }

    Ok(())
}

/// Loose well-formedness check (local@domain.tld); deliverability is out of
/// scope.
pub fn validate_email(value: &str) -> Result<(), FieldValidationError> {
    if value.len() > 255 || !EMAIL_PATTERN.is_match(value) {
        return Err(FieldValidationError::InvalidEmail);
    }

    Ok(())
}

/// Collect every applicable password weakness.
///
/// Returns the full list so a form can report all of them at once.
pub fn validate_password_strength(password: &str) -> Result<(), Vec<PasswordWeakness>> {
    let mut weaknesses = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        weaknesses.push(PasswordWeakness::TooShort(MIN_PASSWORD_LENGTH));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        weaknesses.push(PasswordWeakness::NoUppercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        weaknesses.push(PasswordWeakness::NoDigit);
    }

    if weaknesses.is_empty() {
        Ok(())
    } else {
        Err(weaknesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Name field tests
    #[test]
    fn test_no_digits_accepts_plain_names() {
        assert!(validate_no_digits("María").is_ok());
        assert!(validate_no_digits("De la Cruz").is_ok());
        assert!(validate_no_digits("").is_ok());
    }

    #[test]
    fn test_no_digits_rejects_any_digit() {
        assert_eq!(
            validate_no_digits("Mar1a"),
            Err(FieldValidationError::ContainsDigit)
        );
        assert_eq!(
            validate_no_digits("2fast"),
            Err(FieldValidationError::ContainsDigit)
        );
    }

    // Phone tests
    #[test]
    fn test_phone_accepts_digit_strings() {
        assert!(validate_phone("5512345678").is_ok());
        assert!(validate_phone("0000000").is_ok());
    }

    #[test]
    fn test_phone_rejects_non_digits_and_empty() {
        assert_eq!(
            validate_phone("55-1234-5678"),
            Err(FieldValidationError::InvalidPhone)
        );
        assert_eq!(
            validate_phone("+525512345678"),
            Err(FieldValidationError::InvalidPhone)
        );
        assert_eq!(validate_phone(""), Err(FieldValidationError::InvalidPhone));
    }

    // CURP tests
    #[test]
    fn test_curp_accepts_valid_values() {
        assert!(validate_curp("HEGG560427MVZRRL04").is_ok());
        assert!(validate_curp("GOMC900101HDFRRL09").is_ok());
        // Lowercase input is uppercased before matching
        assert!(validate_curp("hegg560427mvzrrl04").is_ok());
    }

    #[test]
    fn test_curp_rejects_bad_shapes() {
        // Empty and wrong length
        assert_eq!(validate_curp(""), Err(FieldValidationError::InvalidCurp));
        assert_eq!(
            validate_curp("HEGG560427MVZRRL0"),
            Err(FieldValidationError::InvalidCurp)
        );
        assert_eq!(
            validate_curp("HEGG560427MVZRRL040"),
            Err(FieldValidationError::InvalidCurp)
        );
        // Month 13
        assert_eq!(
            validate_curp("HEGG561327MVZRRL04"),
            Err(FieldValidationError::InvalidCurp)
        );
        // Day 32
        assert_eq!(
            validate_curp("HEGG560432MVZRRL04"),
            Err(FieldValidationError::InvalidCurp)
        );
        // State code not in the official list
        assert_eq!(
            validate_curp("HEGG560427MXXRRL04"),
            Err(FieldValidationError::InvalidCurp)
        );
        // Second character must be a vowel
        assert_eq!(
            validate_curp("HXGG560427MVZRRL04"),
            Err(FieldValidationError::InvalidCurp)
        );
        // Sex marker must be H or M
        assert_eq!(
            validate_curp("HEGG560427XVZRRL04"),
            Err(FieldValidationError::InvalidCurp)
        );
    }

    // RFC tests
    #[test]
    fn test_rfc_accepts_person_and_company_shapes() {
        // 13-char person RFC
        assert!(validate_rfc("GOMC900101AB1").is_ok());
        // 12-char company RFC
        assert!(validate_rfc("ABC850101XY2").is_ok());
        // Ñ and & are legal in the letter block
        assert!(validate_rfc("ÑAÑ850101AAA").is_ok());
        assert!(validate_rfc("A&B850101AAA").is_ok());
        assert!(validate_rfc("gomc900101ab1").is_ok());
    }

    #[test]
    fn test_rfc_rejects_bad_shapes() {
        assert_eq!(validate_rfc(""), Err(FieldValidationError::InvalidRfc));
        // Too few letters
        assert_eq!(
            validate_rfc("AB850101AAA"),
            Err(FieldValidationError::InvalidRfc)
        );
        // Month 13
        assert_eq!(
            validate_rfc("GOM901301AB1"),
            Err(FieldValidationError::InvalidRfc)
        );
        // Digit where a letter is required
        assert_eq!(
            validate_rfc("G1M850101AAA"),
            Err(FieldValidationError::InvalidRfc)
        );
        // Trailing garbage
        assert_eq!(
            validate_rfc("GOMC900101AB1X"),
            Err(FieldValidationError::InvalidRfc)
        );
    }

    // Email tests
    #[test]
    fn test_email_shapes() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.mx").is_ok());
        assert_eq!(
            validate_email("not-an-email"),
            Err(FieldValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_email("two@@example.com"),
            Err(FieldValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_email(&format!("{}@example.com", "a".repeat(250))),
            Err(FieldValidationError::InvalidEmail)
        );
    }

    // Password strength tests
    #[test]
    fn test_password_strength_accepts_strong_password() {
        assert!(validate_password_strength("Str0ngpass").is_ok());
    }

    #[test]
    fn test_password_strength_accumulates_all_failures() {
        let weaknesses = validate_password_strength("abc").unwrap_err();
        assert_eq!(
            weaknesses,
            vec![
                PasswordWeakness::TooShort(MIN_PASSWORD_LENGTH),
                PasswordWeakness::NoUppercase,
                PasswordWeakness::NoDigit,
            ]
        );
    }

    #[test]
    fn test_password_strength_reports_single_failure() {
        assert_eq!(
            validate_password_strength("alllowercase1"),
            Err(vec![PasswordWeakness::NoUppercase])
        );
        assert_eq!(
            validate_password_strength("NoDigitsHere"),
            Err(vec![PasswordWeakness::NoDigit])
        );
        assert_eq!(
            validate_password_strength("Ab1"),
            Err(vec![PasswordWeakness::TooShort(MIN_PASSWORD_LENGTH)])
        );
    }
}
