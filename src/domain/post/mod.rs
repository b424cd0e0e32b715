//! Post domain
//!
//! Posts are directional: donees publish requests, donors publish offers,
//! institutions publish either. The creation rule table in [`policy`] is
//! the only place that mapping lives.

mod entity;
mod policy;
mod store;
mod validation;

pub use entity::{Category, CategoryId, Post, PostId, PostRecord, PostStatus, PostType};
pub use policy::{
    draft_for_role, InstitutionPostInput, PostDraft, PostSubmission, RestrictedPostInput,
};
pub use store::PostStore;

#[cfg(test)]
pub use store::mock;
pub use validation::{
    validate_description, validate_quantity, validate_title, PostValidationError,
    MAX_TITLE_LENGTH,
};
