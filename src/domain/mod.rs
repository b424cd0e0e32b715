//! Domain layer - Core business logic and entities

pub mod account;
pub mod error;
pub mod identity;
pub mod post;
pub mod profile;
pub mod registration;
pub mod transaction;
pub mod validation;

pub use account::{AccountId, AccountStatus, UserAccount};
pub use error::{DomainError, FieldErrors};
pub use identity::IdentityStore;
#[cfg(test)]
pub use identity::MockIdentityStore;
pub use post::{
    draft_for_role, Category, CategoryId, Post, PostId, PostStatus, PostStore, PostSubmission,
    PostType,
};
pub use profile::{InstitutionProfile, PersonKind, PersonProfile, Profile, ProfileId, Role};
pub use registration::{InstitutionRegistrationForm, PersonRegistrationForm};
pub use transaction::{Transaction, TransactionId, TransactionStatus};
pub use validation::{
    validate_curp, validate_email, validate_no_digits, validate_password_strength, validate_phone,
    validate_rfc, FieldValidationError, PasswordWeakness,
};
