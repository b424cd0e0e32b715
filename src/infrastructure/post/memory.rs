//! In-memory post store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    AccountId, Category, CategoryId, DomainError, Post, PostId, PostStore, PostType, Transaction,
    TransactionId,
};

/// Categories, posts and transactions under one lock.
#[derive(Debug, Default)]
struct Tables {
    categories: HashMap<CategoryId, Category>,
    posts: HashMap<PostId, Post>,
    transactions: HashMap<TransactionId, Transaction>,
}

/// In-memory implementation of the post store
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    tables: RwLock<Tables>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
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
impl PostStore for InMemoryPostStore {
    async fn create_category(&self, category: Category) -> Result<Category, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.categories.values().any(|c| c.name() == category.name()) {
            return Err(DomainError::duplicate(
                "name",
                "A category with this name already exists",
            ));
        }

        tables.categories.insert(category.id(), category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let tables = self.tables.read().await;
        let mut all: Vec<Category> = tables.categories.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }

    async fn count_categories(&self) -> Result<usize, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.len())
    }

    async fn create_post(&self, post: Post) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.categories.contains_key(&post.category_id()) {
            return Err(DomainError::validation("Category does not exist"));
        }

        tables.posts.insert(post.id(), post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn update_post(&self, post: &Post) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.posts.contains_key(&post.id()) {
            return Err(DomainError::not_found(format!(
                "Post '{}' not found",
                post.id()
            )));
        }

        tables.posts.insert(post.id(), post.clone());
        Ok(post.clone())
    }

    async fn posts_by_author(
        &self,
        author_id: AccountId,
        post_type: Option<PostType>,
    ) -> Result<Vec<Post>, DomainError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Post> = tables
            .posts
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
        let tables = self.tables.read().await;
        let mut matching: Vec<Post> = tables
            .posts
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
        let mut tables = self.tables.write().await;

        if !tables.posts.contains_key(&transaction.post_id()) {
            return Err(DomainError::validation("Post does not exist"));
        }

        tables
            .transactions
            .insert(transaction.id(), transaction.clone());
        Ok(transaction)
    }

    async fn get_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.transactions.get(&id).cloned())
    }

    async fn update_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Transaction, DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.transactions.contains_key(&transaction.id()) {
            return Err(DomainError::not_found(format!(
                "Transaction '{}' not found",
                transaction.id()
            )));
        }

        tables
            .transactions
            .insert(transaction.id(), transaction.clone());
        Ok(transaction.clone())
    }

    async fn transactions_by_participant(
        &self,
        participant_id: AccountId,
    ) -> Result<Vec<Transaction>, DomainError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Transaction> = tables
            .transactions
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
        let tables = self.tables.read().await;
        let mut matching: Vec<Transaction> = tables
            .transactions
            .values()
            .filter(|t| {
                tables
                    .posts
                    .get(&t.post_id())
                    .is_some_and(|p| p.author_id() == author_id)
            })
            .cloned()
            .collect();
        Self::sort_transactions_newest_first(&mut matching);
        Ok(matching)
    }
}
