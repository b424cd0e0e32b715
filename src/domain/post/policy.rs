//! Post creation rule table
//!
//! What a caller may choose when creating a post depends on the resolved
//! role:
//!
//! | role        | post_type      | is_campaign   | lands in          |
//! |-------------|----------------|---------------|-------------------|
//! | donee       | forced request | forced false  | donee feed        |
//! | donor       | forced offer   | forced false  | donor feed        |
//! | institution | caller choice  | caller choice | institution feed  |
//! | unknown     | rejected (incomplete profile)  |                   |
//!
//! Donees and donors submit the restricted input variant, which has no
//! type or campaign fields at all; whatever a client sends for them is
//! dropped during conversion rather than checked at runtime.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::post::entity::{CategoryId, PostType};
use crate::domain::profile::Role;

/// A post submission as it arrives from a client, before the rule table
/// has been applied
#[derive(Debug, Clone, Deserialize)]
pub struct PostSubmission {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub quantity: Decimal,
    /// Only honored for institutions
    #[serde(default)]
    pub post_type: Option<PostType>,
    /// Only honored for institutions
    #[serde(default)]
    pub is_campaign: Option<bool>,
}

/// Post input as a donee or donor may shape it: no type or campaign choice
#[derive(Debug, Clone)]
pub struct RestrictedPostInput {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub quantity: Decimal,
}

impl From<PostSubmission> for RestrictedPostInput {
    /// Drops any submitted type or campaign choice
    fn from(submission: PostSubmission) -> Self {
        Self {
            title: submission.title,
            description: submission.description,
            category_id: submission.category_id,
            quantity: submission.quantity,
        }
    }
}

/// Post input as an institution may shape it: direction and campaign flag
/// are the caller's choice
#[derive(Debug, Clone)]
pub struct InstitutionPostInput {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub quantity: Decimal,
    pub post_type: PostType,
    pub is_campaign: bool,
}

impl TryFrom<PostSubmission> for InstitutionPostInput {
    type Error = DomainError;

    fn try_from(submission: PostSubmission) -> Result<Self, Self::Error> {
        let post_type = submission
            .post_type
            .ok_or_else(|| DomainError::validation("post_type is required"))?;

        Ok(Self {
            title: submission.title,
            description: submission.description,
            category_id: submission.category_id,
            quantity: submission.quantity,
            post_type,
            is_campaign: submission.is_campaign.unwrap_or(false),
        })
    }
}

/// A submission with the role-dependent fields fully resolved, ready to
/// become a post
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub quantity: Decimal,
    pub post_type: PostType,
    pub is_campaign: bool,
}

impl RestrictedPostInput {
    fn into_draft(self, post_type: PostType) -> PostDraft {
        PostDraft {
            title: self.title,
            description: self.description,
            category_id: self.category_id,
            quantity: self.quantity,
            post_type,
            is_campaign: false,
        }
    }
}

impl InstitutionPostInput {
    fn into_draft(self) -> PostDraft {
        PostDraft {
            title: self.title,
            description: self.description,
            category_id: self.category_id,
            quantity: self.quantity,
            post_type: self.post_type,
            is_campaign: self.is_campaign,
        }
    }
}

/// Apply the creation rule table for a resolved role
pub fn draft_for_role(role: Role, submission: PostSubmission) -> Result<PostDraft, DomainError> {
    match role {
        Role::Donee => Ok(RestrictedPostInput::from(submission).into_draft(PostType::Request)),
        Role::Donor => Ok(RestrictedPostInput::from(submission).into_draft(PostType::Offer)),
        Role::Institution => Ok(InstitutionPostInput::try_from(submission)?.into_draft()),
        Role::Unknown => Err(DomainError::incomplete_profile()),
    }
}
