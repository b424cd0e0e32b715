//! PostgreSQL post store implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::post::PostRecord;
use crate::domain::transaction::TransactionRecord;
use crate::domain::{
    AccountId, Category, CategoryId, DomainError, Post, PostId, PostStatus, PostStore, PostType,
    Transaction, TransactionId, TransactionStatus,
};

/// PostgreSQL implementation of the post store
///
/// Listing queries order by `created_at DESC, id DESC` so pagination stays
/// deterministic when timestamps collide.
#[derive(Debug, Clone)]
pub struct PostgresPostStore {
    pool: PgPool,
}

impl PostgresPostStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn create_category(&self, category: Category) -> Result<Category, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(category.id().as_uuid())
        .bind(category.name())
        .bind(category.description())
        .bind(category.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_storage_error(e, "Failed to create category"))?;

        Ok(category)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at FROM categories WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get category: {}", e)))?;

        Ok(row.map(|row| row_to_category(&row)))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list categories: {}", e)))?;

        Ok(rows.iter().map(row_to_category).collect())
    }

    async fn count_categories(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count categories: {}", e)))?;

        Ok(count as usize)
    }

    async fn create_post(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, description, category_id, quantity,
                               post_type, status, is_campaign, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.author_id().as_uuid())
        .bind(post.title())
        .bind(post.description())
        .bind(post.category_id().as_uuid())
        .bind(post.quantity())
        .bind(post.post_type().as_str())
        .bind(post.status().as_str())
        .bind(post.is_campaign())
        .bind(post.created_at())
        .bind(post.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_storage_error(e, "Failed to create post"))?;

        Ok(post)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, author_id, title, description, category_id, quantity,
                   post_type, status, is_campaign, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get post: {}", e)))?;

        Ok(row.map(|row| row_to_post(&row)))
    }

    async fn update_post(&self, post: &Post) -> Result<Post, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.status().as_str())
        .bind(post.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update post: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Post '{}' not found",
                post.id()
            )));
        }

        Ok(post.clone())
    }

    async fn posts_by_author(
        &self,
        author_id: AccountId,
        post_type: Option<PostType>,
    ) -> Result<Vec<Post>, DomainError> {
        let rows = match post_type {
            Some(t) => {
                sqlx::query(
                    r#"
                    SELECT id, author_id, title, description, category_id, quantity,
                           post_type, status, is_campaign, created_at, updated_at
                    FROM posts
                    WHERE author_id = $1 AND post_type = $2
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .bind(author_id.as_uuid())
                .bind(t.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, author_id, title, description, category_id, quantity,
                           post_type, status, is_campaign, created_at, updated_at
                    FROM posts
                    WHERE author_id = $1
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .bind(author_id.as_uuid())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list posts by author: {}", e)))?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn available_posts(
        &self,
        exclude_author: AccountId,
        post_type: Option<PostType>,
    ) -> Result<Vec<Post>, DomainError> {
        let rows = match post_type {
            Some(t) => {
                sqlx::query(
                    r#"
                    SELECT id, author_id, title, description, category_id, quantity,
                           post_type, status, is_campaign, created_at, updated_at
                    FROM posts
                    WHERE status = 'active' AND author_id <> $1 AND post_type = $2
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .bind(exclude_author.as_uuid())
                .bind(t.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, author_id, title, description, category_id, quantity,
                           post_type, status, is_campaign, created_at, updated_at
                    FROM posts
                    WHERE status = 'active' AND author_id <> $1
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .bind(exclude_author.as_uuid())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list available posts: {}", e)))?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn create_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, post_id, participant_id, quantity_committed,
                                      status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(transaction.id().as_uuid())
        .bind(transaction.post_id().as_uuid())
        .bind(transaction.participant_id().as_uuid())
        .bind(transaction.quantity_committed())
        .bind(transaction.status().as_str())
        .bind(transaction.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_storage_error(e, "Failed to create transaction"))?;

        Ok(transaction)
    }

    async fn get_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, post_id, participant_id, quantity_committed, status, created_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get transaction: {}", e)))?;

        Ok(row.map(|row| row_to_transaction(&row)))
    }

    async fn update_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Transaction, DomainError> {
        let result = sqlx::query("UPDATE transactions SET status = $2 WHERE id = $1")
            .bind(transaction.id().as_uuid())
            .bind(transaction.status().as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update transaction: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Transaction '{}' not found",
                transaction.id()
            )));
        }

        Ok(transaction.clone())
    }

    async fn transactions_by_participant(
        &self,
        participant_id: AccountId,
    ) -> Result<Vec<Transaction>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, post_id, participant_id, quantity_committed, status, created_at
            FROM transactions
            WHERE participant_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(participant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to list transactions by participant: {}", e))
        })?;

        Ok(rows.iter().map(row_to_transaction).collect())
    }

    async fn transactions_for_author(
        &self,
        author_id: AccountId,
    ) -> Result<Vec<Transaction>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.post_id, t.participant_id, t.quantity_committed, t.status,
                   t.created_at
            FROM transactions t
            JOIN posts p ON p.id = t.post_id
            WHERE p.author_id = $1
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(author_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to list transactions for author: {}", e))
        })?;

        Ok(rows.iter().map(row_to_transaction).collect())
    }
}

fn row_to_category(row: &PgRow) -> Category {
    let id: Uuid = row.get("id");

    Category::restore(
        CategoryId::from_uuid(id),
        row.get("name"),
        row.get("description"),
        row.get("created_at"),
    )
}

fn row_to_post(row: &PgRow) -> Post {
    let id: Uuid = row.get("id");
    let author_id: Uuid = row.get("author_id");
    let category_id: Uuid = row.get("category_id");
    let post_type: String = row.get("post_type");
    let status: String = row.get("status");

    Post::restore(PostRecord {
        id: PostId::from_uuid(id),
        author_id: AccountId::from_uuid(author_id),
        title: row.get("title"),
        description: row.get("description"),
        category_id: CategoryId::from_uuid(category_id),
        quantity: row.get("quantity"),
        post_type: str_to_post_type(&post_type),
        status: str_to_post_status(&status),
        is_campaign: row.get("is_campaign"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn row_to_transaction(row: &PgRow) -> Transaction {
    let id: Uuid = row.get("id");
    let post_id: Uuid = row.get("post_id");
    let participant_id: Uuid = row.get("participant_id");
    let status: String = row.get("status");

    Transaction::restore(TransactionRecord {
        id: TransactionId::from_uuid(id),
        post_id: PostId::from_uuid(post_id),
        participant_id: AccountId::from_uuid(participant_id),
        quantity_committed: row.get("quantity_committed"),
        status: str_to_transaction_status(&status),
        created_at: row.get("created_at"),
    })
}

fn str_to_post_type(s: &str) -> PostType {
    match s {
        "offer" => PostType::Offer,
        _ => PostType::Request,
    }
}

fn str_to_post_status(s: &str) -> PostStatus {
    match s {
        "in_progress" => PostStatus::InProgress,
        "completed" => PostStatus::Completed,
        "cancelled" => PostStatus::Cancelled,
        _ => PostStatus::Active,
    }
}

fn str_to_transaction_status(s: &str) -> TransactionStatus {
    match s {
        "approved" => TransactionStatus::Approved,
        "rejected" => TransactionStatus::Rejected,
        "completed" => TransactionStatus::Completed,
        _ => TransactionStatus::Pending,
    }
}

/// Maps unique and foreign key violations to domain errors; everything else
/// becomes a storage fault with context.
fn map_storage_error(error: sqlx::Error, context: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        match db.kind() {
            sqlx::error::ErrorKind::UniqueViolation => {
                let constraint = db.constraint().unwrap_or_default();
                if constraint.contains("name") {
                    return DomainError::duplicate(
                        "name",
                        "A category with this name already exists",
                    );
                }
                return DomainError::duplicate("unknown", "This value is already taken");
            }
            sqlx::error::ErrorKind::ForeignKeyViolation => {
                let constraint = db.constraint().unwrap_or_default();
                if constraint.contains("category") {
                    return DomainError::validation("Category does not exist");
                }
                if constraint.contains("post") {
                    return DomainError::validation("Post does not exist");
                }
                return DomainError::validation("Referenced row does not exist");
            }
            sqlx::error::ErrorKind::CheckViolation => {
                return DomainError::validation("Quantity must be greater than zero");
            }
            _ => {}
        }
    }

    DomainError::storage(format!("{}: {}", context, error))
}
