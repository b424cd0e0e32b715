use std::sync::Arc;

use crate::domain::post::{validate_description, validate_quantity, validate_title};
use crate::domain::{
    draft_for_role, Category, CategoryId, DomainError, FieldErrors, IdentityStore, Post, PostId,
    PostStore, PostSubmission, UserAccount,
};

/// Creates and manages posts and their reference categories.
///
/// Post creation resolves the author's role first and applies the role rule
/// table: donees always publish requests, donors always publish offers,
/// institutions choose. The author is always the acting account, never
/// client input.
pub struct PostService {
    posts: Arc<dyn PostStore>,
    identity: Arc<dyn IdentityStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, identity: Arc<dyn IdentityStore>) -> Self {
        Self { posts, identity }
    }

    /// Validates and persists a new post authored by `author`.
    pub async fn create_post(
        &self,
        author: &UserAccount,
        submission: PostSubmission,
    ) -> Result<Post, DomainError> {
        let role = self.identity.resolve_role(author.id()).await?;
        let draft = draft_for_role(role, submission)?;

        let mut errors = FieldErrors::new();
        if let Err(error) = validate_title(&draft.title) {
            errors.entry("title".to_string()).or_default().push(error.to_string());
        }
        if let Err(error) = validate_description(&draft.description) {
            errors
                .entry("description".to_string())
                .or_default()
                .push(error.to_string());
        }
        if let Err(error) = validate_quantity(draft.quantity) {
            errors
                .entry("quantity".to_string())
                .or_default()
                .push(error.to_string());
        }
        if !self.posts.category_exists(draft.category_id).await? {
            errors
                .entry("category_id".to_string())
                .or_default()
                .push("Category does not exist".to_string());
        }
        if !errors.is_empty() {
            return Err(DomainError::invalid_form(errors));
        }

        let post = Post::new(
            author.id(),
            draft.title,
            draft.description,
            draft.category_id,
            draft.quantity,
            draft.post_type,
            draft.is_campaign,
        );

        self.posts.create_post(post).await
    }

    /// Get a post by id, returning an error if not found
    pub async fn get_required(&self, id: PostId) -> Result<Post, DomainError> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Post '{}' not found", id)))
    }

    /// Cancels an active post. Only the author may cancel.
    pub async fn cancel_post(
        &self,
        account: &UserAccount,
        id: PostId,
    ) -> Result<Post, DomainError> {
        let mut post = self.get_required(id).await?;

        if post.author_id() != account.id() {
            return Err(DomainError::forbidden("Only the author can cancel a post"));
        }

        post.cancel()?;
        self.posts.update_post(&post).await
    }

    /// Create a category; the name must be unique
    pub async fn create_category(
        &self,
        name: String,
        description: String,
    ) -> Result<Category, DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            let mut errors = FieldErrors::new();
            errors
                .entry("name".to_string())
                .or_default()
                .push("This field is required".to_string());
            return Err(DomainError::invalid_form(errors));
        }

        self.posts.create_category(Category::new(name, description)).await
    }

    /// List all categories, alphabetically
    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.posts.list_categories().await
    }

    /// Get a category by id, returning an error if not found
    pub async fn get_category_required(&self, id: CategoryId) -> Result<Category, DomainError> {
        self.posts
            .get_category(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Category '{}' not found", id)))
    }
}
