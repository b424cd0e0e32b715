use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::post::validate_quantity;
use crate::domain::{
    DomainError, FieldErrors, Post, PostId, PostStatus, PostStore, Transaction, TransactionId,
    UserAccount,
};

/// An account's commitments, split by direction.
#[derive(Debug)]
pub struct TransactionOverview {
    /// Commitments the account made against others' posts
    pub outgoing: Vec<Transaction>,
    /// Commitments others made against the account's posts
    pub incoming: Vec<Transaction>,
}

/// Manages commitments against posts.
///
/// Anyone but the author may commit against an active post. From there the
/// post author drives the lifecycle: approve or reject while pending, then
/// confirm delivery to complete. The first approval moves the post to in
/// progress and a completed delivery completes the post.
pub struct TransactionService {
    posts: Arc<dyn PostStore>,
}

impl TransactionService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// Opens a pending commitment of `quantity` against the post.
    pub async fn commit(
        &self,
        participant: &UserAccount,
        post_id: PostId,
        quantity: Decimal,
    ) -> Result<Transaction, DomainError> {
        let post = self.required_post(post_id).await?;

        if !post.status().is_active() {
            return Err(DomainError::validation(
                "Only active posts accept new transactions",
            ));
        }

        if post.author_id() == participant.id() {
            return Err(DomainError::validation(
                "You cannot open a transaction on your own post",
            ));
        }

        if let Err(error) = validate_quantity(quantity) {
            let mut errors = FieldErrors::new();
            errors
                .entry("quantity_committed".to_string())
                .or_default()
                .push(error.to_string());
            return Err(DomainError::invalid_form(errors));
        }

        let transaction = Transaction::new(post_id, participant.id(), quantity);
        self.posts.create_transaction(transaction).await
    }

    /// Approves a pending commitment. First approval moves the post from
    /// active to in progress.
    pub async fn approve(
        &self,
        account: &UserAccount,
        id: TransactionId,
    ) -> Result<Transaction, DomainError> {
        let (mut transaction, mut post) = self.owned_by_author(account, id).await?;

        transaction.approve()?;

        if post.status() == PostStatus::Active {
            post.begin_progress()?;
            self.posts.update_post(&post).await?;
        }

        self.posts.update_transaction(&transaction).await
    }

    /// Rejects a pending commitment.
    pub async fn reject(
        &self,
        account: &UserAccount,
        id: TransactionId,
    ) -> Result<Transaction, DomainError> {
        let (mut transaction, _) = self.owned_by_author(account, id).await?;

        transaction.reject()?;
        self.posts.update_transaction(&transaction).await
    }

    /// Confirms delivery of an approved commitment, completing both the
    /// transaction and its post.
    pub async fn complete(
        &self,
        account: &UserAccount,
        id: TransactionId,
    ) -> Result<Transaction, DomainError> {
        let (mut transaction, mut post) = self.owned_by_author(account, id).await?;

        transaction.complete()?;
        post.complete()?;

        self.posts.update_post(&post).await?;
        self.posts.update_transaction(&transaction).await
    }

    /// Both directions of the account's commitments, newest first.
    pub async fn overview_for(
        &self,
        account: &UserAccount,
    ) -> Result<TransactionOverview, DomainError> {
        let outgoing = self.posts.transactions_by_participant(account.id()).await?;
        let incoming = self.posts.transactions_for_author(account.id()).await?;

        Ok(TransactionOverview { outgoing, incoming })
    }

    /// Get a transaction by id, returning an error if not found
    pub async fn get_required(&self, id: TransactionId) -> Result<Transaction, DomainError> {
        self.posts
            .get_transaction(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Transaction '{}' not found", id)))
    }

    async fn required_post(&self, id: PostId) -> Result<Post, DomainError> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Post '{}' not found", id)))
    }

    /// Loads the transaction together with its post and checks the acting
    /// account authored that post.
    async fn owned_by_author(
        &self,
        account: &UserAccount,
        id: TransactionId,
    ) -> Result<(Transaction, Post), DomainError> {
        let transaction = self.get_required(id).await?;
        let post = self.required_post(transaction.post_id()).await?;

        if post.author_id() != account.id() {
            return Err(DomainError::forbidden(
                "Only the post author can manage its transactions",
            ));
        }

        Ok((transaction, post))
    }
}
