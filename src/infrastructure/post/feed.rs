use std::sync::Arc;

use crate::domain::{
    DomainError, IdentityStore, Post, PostStore, PostType, Role, UserAccount,
};

/// The two read-only result sets a feed request returns.
#[derive(Debug)]
pub struct Feed {
    pub role: Role,
    /// Posts authored by the acting account, all statuses
    pub mine: Vec<Post>,
    /// Active posts by other accounts the acting account can match with
    pub available: Vec<Post>,
}

/// Builds the role-directed feed.
///
/// A donee sees their own requests plus others' active offers; a donor the
/// mirror image; an institution sees everything it authored plus every
/// active post by others, both directions. Both lists come back newest
/// first with the post id as a stable tiebreak.
pub struct FeedService {
    posts: Arc<dyn PostStore>,
    identity: Arc<dyn IdentityStore>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostStore>, identity: Arc<dyn IdentityStore>) -> Self {
        Self { posts, identity }
    }

    /// Assembles the feed for the acting account.
    ///
    /// An account without a profile has no feed direction and is rejected
    /// with an incomplete-profile error.
    pub async fn feed_for(&self, account: &UserAccount) -> Result<Feed, DomainError> {
        let role = self.identity.resolve_role(account.id()).await?;

        let (mine_type, available_type) = match role {
            Role::Donee => (Some(PostType::Request), Some(PostType::Offer)),
            Role::Donor => (Some(PostType::Offer), Some(PostType::Request)),
            Role::Institution => (None, None),
            Role::Unknown => return Err(DomainError::incomplete_profile()),
        };

        let mine = self.posts.posts_by_author(account.id(), mine_type).await?;
        let available = self
            .posts
            .available_posts(account.id(), available_type)
            .await?;

        Ok(Feed {
            role,
            mine,
            available,
        })
    }
}
