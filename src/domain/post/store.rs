//! Post store trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::account::AccountId;
use crate::domain::post::entity::{Category, CategoryId, Post, PostId, PostType};
use crate::domain::transaction::{Transaction, TransactionId};
use crate::domain::DomainError;

/// Store for posts, their categories and the transactions against them
///
/// All listing methods order newest first, with the row id as a stable
/// tiebreak for equal timestamps.
#[async_trait]
pub trait PostStore: Send + Sync + Debug {
    // Categories

    /// Create a category; the name is unique
    async fn create_category(&self, category: Category) -> Result<Category, DomainError>;

    /// Get a category by id
    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, DomainError>;

    /// List all categories, alphabetically
    async fn list_categories(&self) -> Result<Vec<Category>, DomainError>;

    /// Check if a category exists
    async fn category_exists(&self, id: CategoryId) -> Result<bool, DomainError> {
        Ok(self.get_category(id).await?.is_some())
    }

    /// Count categories (bootstrap seeds defaults at zero)
    async fn count_categories(&self) -> Result<usize, DomainError>;

    // Posts

    /// Create a post
    async fn create_post(&self, post: Post) -> Result<Post, DomainError>;

    /// Get a post by id
    async fn get_post(&self, id: PostId) -> Result<Option<Post>, DomainError>;

    /// Persist a status change
    async fn update_post(&self, post: &Post) -> Result<Post, DomainError>;

    /// The author's own posts, optionally narrowed to one direction
    async fn posts_by_author(
        &self,
        author_id: AccountId,
        post_type: Option<PostType>,
    ) -> Result<Vec<Post>, DomainError>;

    /// Active posts by other accounts, optionally narrowed to one direction
    async fn available_posts(
        &self,
        exclude_author: AccountId,
        post_type: Option<PostType>,
    ) -> Result<Vec<Post>, DomainError>;

    // Transactions

    /// Create a transaction
    async fn create_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, DomainError>;

    /// Get a transaction by id
    async fn get_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, DomainError>;

    /// Persist a status change
    async fn update_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Transaction, DomainError>;

    /// Commitments the account has made against others' posts
    async fn transactions_by_participant(
        &self,
        participant_id: AccountId,
    ) -> Result<Vec<Transaction>, DomainError>;

    /// Commitments other accounts have made against this author's posts
    async fn transactions_for_author(
        &self,
        author_id: AccountId,
    ) -> Result<Vec<Transaction>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock post store for testing
    #[derive(Debug, Default)]
    pub struct MockPostStore {
        categories: Arc<RwLock<HashMap<CategoryId, Category>>>,
        posts: Arc<RwLock<HashMap<PostId, Post>>>,
        transactions: Arc<RwLock<HashMap<TransactionId, Transaction>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockPostStore {
        /// Create a new mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock store configured to fail"));
            }
            Ok(())
        }

        fn sort_posts_newest_first(posts: &mut [Post]) {
            posts.sort_by(|a, b| {
                b.created_at()
                    .cmp(&a.created_at())
                    .then(b.id().cmp(&a.id()))
            });
        }

        fn sort_transactions_newest_first(transactions: &mut [Transaction]) {
            transactions.sort_by(|a, b| {
                b.created_at()
                    .cmp(&a.created_at())
                    .then(b.id().cmp(&a.id()))
            });
        }
    }

    #[async_trait]
    impl PostStore for MockPostStore {
        async fn create_category(&self, category: Category) -> Result<Category, DomainError> {
            self.check_should_fail().await?;
            let mut categories = self.categories.write().await;

            if categories.values().any(|c| c.name() == category.name()) {
                return Err(DomainError::duplicate(
                    "name",
                    "A category with this name already exists",
                ));
            }

            categories.insert(category.id(), category.clone());
            Ok(category)
        }

        async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, DomainError> {
            self.check_should_fail().await?;
            let categories = self.categories.read().await;
            Ok(categories.get(&id).cloned())
        }

        async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
            self.check_should_fail().await?;
            let categories = self.categories.read().await;
            let mut all: Vec<Category> = categories.values().cloned().collect();
            all.sort_by(|a, b| a.name().cmp(b.name()));
            Ok(all)
        }

        async fn count_categories(&self) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            let categories = self.categories.read().await;
            Ok(categories.len())
        }

        async fn create_post(&self, post: Post) -> Result<Post, DomainError> {
            self.check_should_fail().await?;
            let mut posts = self.posts.write().await;
            posts.insert(post.id(), post.clone());
            Ok(post)
        }

        async fn get_post(&self, id: PostId) -> Result<Option<Post>, DomainError> {
            self.check_should_fail().await?;
            let posts = self.posts.read().await;
            Ok(posts.get(&id).cloned())
        }

        async fn update_post(&self, post: &Post) -> Result<Post, DomainError> {
            self.check_should_fail().await?;
            let mut posts = self.posts.write().await;

            if !posts.contains_key(&post.id()) {
                return Err(DomainError::not_found(format!(
                    "Post '{}' not found",
                    post.id()
                )));
            }

            posts.insert(post.id(), post.clone());
            Ok(post.clone())
        }

        async fn posts_by_author(
            &self,
            author_id: AccountId,
            post_type: Option<PostType>,
        ) -> Result<Vec<Post>, DomainError> {
            self.check_should_fail().await?;
            let posts = self.posts.read().await;
            let mut matching: Vec<Post> = posts
                .values()
                .filter(|p| p.author_id() == author_id)
                .filter(|p| post_type.is_none_or(|t| p.post_type() == t))
                .cloned()
                .collect();
            Self::sort_posts_newest_first(&mut matching);
            Ok(matching)
        }

        async fn available_posts(
            &self,
            exclude_author: AccountId,
            post_type: Option<PostType>,
        ) -> Result<Vec<Post>, DomainError> {
            self.check_should_fail().await?;
            let posts = self.posts.read().await;
            let mut matching: Vec<Post> = posts
                .values()
                .filter(|p| p.status().is_active())
                .filter(|p| p.author_id() != exclude_author)
                .filter(|p| post_type.is_none_or(|t| p.post_type() == t))
                .cloned()
                .collect();
            Self::sort_posts_newest_first(&mut matching);
            Ok(matching)
        }

        async fn create_transaction(
            &self,
            transaction: Transaction,
        ) -> Result<Transaction, DomainError> {
            self.check_should_fail().await?;
            let mut transactions = self.transactions.write().await;
            transactions.insert(transaction.id(), transaction.clone());
            Ok(transaction)
        }

        async fn get_transaction(
            &self,
            id: TransactionId,
        ) -> Result<Option<Transaction>, DomainError> {
            self.check_should_fail().await?;
            let transactions = self.transactions.read().await;
            Ok(transactions.get(&id).cloned())
        }

        async fn update_transaction(
            &self,
            transaction: &Transaction,
        ) -> Result<Transaction, DomainError> {
            self.check_should_fail().await?;
            let mut transactions = self.transactions.write().await;

            if !transactions.contains_key(&transaction.id()) {
                return Err(DomainError::not_found(format!(
                    "Transaction '{}' not found",
                    transaction.id()
                )));
            }

            transactions.insert(transaction.id(), transaction.clone());
            Ok(transaction.clone())
        }

        async fn transactions_by_participant(
            &self,
            participant_id: AccountId,
        ) -> Result<Vec<Transaction>, DomainError> {
            self.check_should_fail().await?;
            let transactions = self.transactions.read().await;
            let mut matching: Vec<Transaction> = transactions
                .values()
                .filter(|t| t.participant_id() == participant_id)
                .cloned()
                .collect();
            Self::sort_transactions_newest_first(&mut matching);
            Ok(matching)
        }

        async fn transactions_for_author(
            &self,
            author_id: AccountId,
        ) -> Result<Vec<Transaction>, DomainError> {
            self.check_should_fail().await?;
            let posts = self.posts.read().await;
            let transactions = self.transactions.read().await;
            let mut matching: Vec<Transaction> = transactions
                .values()
                .filter(|t| {
                    posts
                        .get(&t.post_id())
                        .is_some_and(|p| p.author_id() == author_id)
                })
                .cloned()
                .collect();
            Self::sort_transactions_newest_first(&mut matching);
            Ok(matching)
        }
    }
}
