//! Post content validation

use rust_decimal::Decimal;
use thiserror::Error;

/// Maximum length for post titles
pub const MAX_TITLE_LENGTH: usize = 255;

/// Errors that can occur during post validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PostValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title exceeds maximum length of {0} characters")]
    TitleTooLong(usize),

    #[error("Description cannot be empty")]
    EmptyDescription,

    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,
}

/// Validate a post title
pub fn validate_title(title: &str) -> Result<(), PostValidationError> {
    if title.trim().is_empty() {
        return Err(PostValidationError::EmptyTitle);
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(PostValidationError::TitleTooLong(MAX_TITLE_LENGTH));
    }

    Ok(())
}

/// Validate a post description
pub fn validate_description(description: &str) -> Result<(), PostValidationError> {
    if description.trim().is_empty() {
        return Err(PostValidationError::EmptyDescription);
    }

    Ok(())
}

/// Validate a quantity (posts and transaction commitments)
pub fn validate_quantity(quantity: Decimal) -> Result<(), PostValidationError> {
    if quantity <= Decimal::ZERO {
        return Err(PostValidationError::NonPositiveQuantity);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_title() {
        assert!(validate_title("Winter coats").is_ok());
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(validate_title(""), Err(PostValidationError::EmptyTitle));
        assert_eq!(validate_title("   "), Err(PostValidationError::EmptyTitle));
    }

    #[test]
    fn test_title_too_long() {
        let long_title = "a".repeat(256);
        assert_eq!(
            validate_title(&long_title),
            Err(PostValidationError::TitleTooLong(255))
        );
    }

    #[test]
    fn test_empty_description() {
        assert_eq!(
            validate_description(""),
            Err(PostValidationError::EmptyDescription)
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(validate_quantity(Decimal::new(15, 1)).is_ok());
        assert_eq!(
            validate_quantity(Decimal::ZERO),
            Err(PostValidationError::NonPositiveQuantity)
        );
        assert_eq!(
            validate_quantity(Decimal::new(-5, 0)),
            Err(PostValidationError::NonPositiveQuantity)
        );
    }
}
