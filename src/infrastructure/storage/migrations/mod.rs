//! Database migrations infrastructure

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::domain::DomainError;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self) -> Result<(), DomainError>;

    /// Reverts the last applied migration
    async fn revert(&self) -> Result<(), DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, ascending
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// PostgreSQL migrator tracking applied versions in a `_migrations` table
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            migrations: storage_migrations(),
        }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Runs a single migration if it has not been applied yet
    async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        if self.is_applied(migration.version).await? {
            return Ok(());
        }

        sqlx::query(&migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        Ok(())
    }

    /// Reverts a single migration if it is currently applied
    async fn revert_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        if !self.is_applied(migration.version).await? {
            return Ok(());
        }

        sqlx::query(&migration.down)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        Ok(())
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        for migration in &self.migrations {
            self.run_migration(migration).await?;
        }

        Ok(())
    }

    async fn revert(&self) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        let Some(current) = self.version().await? else {
            return Ok(());
        };

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == current)
            .ok_or_else(|| {
                DomainError::storage(format!("Applied migration {} is unknown", current))
            })?;

        self.revert_migration(migration).await
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// All schema migrations, in order
pub fn storage_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email VARCHAR(255) NOT NULL,
                phone VARCHAR(20) NOT NULL,
                password_hash TEXT NOT NULL,
                status VARCHAR(16) NOT NULL DEFAULT 'active',
                is_staff BOOLEAN NOT NULL DEFAULT FALSE,
                is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT users_email_key UNIQUE (email),
                CONSTRAINT users_phone_key UNIQUE (phone)
            );
            "#,
            "DROP TABLE IF EXISTS users;",
        ),
        Migration::new(
            2,
            "Create donees table",
            r#"
            CREATE TABLE IF NOT EXISTS donees (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                first_name VARCHAR(255) NOT NULL,
                middle_name VARCHAR(255),
                first_surname VARCHAR(255) NOT NULL,
                second_surname VARCHAR(255) NOT NULL,
                curp VARCHAR(18) NOT NULL,
                city VARCHAR(255) NOT NULL,
                state VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT donees_user_id_key UNIQUE (user_id),
                CONSTRAINT donees_curp_key UNIQUE (curp),
                CONSTRAINT donees_user_id_fkey FOREIGN KEY (user_id)
                    REFERENCES users(id) ON DELETE CASCADE
            );
            "#,
            "DROP TABLE IF EXISTS donees;",
        ),
        Migration::new(
            3,
            "Create donors table",
            r#"
            CREATE TABLE IF NOT EXISTS donors (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                first_name VARCHAR(255) NOT NULL,
                middle_name VARCHAR(255),
                first_surname VARCHAR(255) NOT NULL,
                second_surname VARCHAR(255) NOT NULL,
                curp VARCHAR(18) NOT NULL,
                city VARCHAR(255) NOT NULL,
                state VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT donors_user_id_key UNIQUE (user_id),
                CONSTRAINT donors_curp_key UNIQUE (curp),
                CONSTRAINT donors_user_id_fkey FOREIGN KEY (user_id)
                    REFERENCES users(id) ON DELETE CASCADE
            );
            "#,
            "DROP TABLE IF EXISTS donors;",
        ),
        Migration::new(
            4,
            "Create institutions table",
            r#"
            CREATE TABLE IF NOT EXISTS institutions (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                name VARCHAR(255) NOT NULL,
                rfc VARCHAR(13) NOT NULL,
                city VARCHAR(255) NOT NULL,
                state VARCHAR(255) NOT NULL,
                address VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT institutions_user_id_key UNIQUE (user_id),
                CONSTRAINT institutions_name_key UNIQUE (name),
                CONSTRAINT institutions_rfc_key UNIQUE (rfc),
                CONSTRAINT institutions_user_id_fkey FOREIGN KEY (user_id)
                    REFERENCES users(id) ON DELETE CASCADE
            );
            "#,
            "DROP TABLE IF EXISTS institutions;",
        ),
        Migration::new(
            5,
            "Create categories table",
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id UUID PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT categories_name_key UNIQUE (name)
            );
            "#,
            "DROP TABLE IF EXISTS categories;",
        ),
        Migration::new(
            6,
            "Create posts table",
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id UUID PRIMARY KEY,
                author_id UUID NOT NULL,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                category_id UUID NOT NULL,
                quantity NUMERIC(12, 2) NOT NULL,
                post_type VARCHAR(16) NOT NULL,
                status VARCHAR(16) NOT NULL DEFAULT 'active',
                is_campaign BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT posts_quantity_check CHECK (quantity > 0),
                CONSTRAINT posts_author_id_fkey FOREIGN KEY (author_id)
                    REFERENCES users(id) ON DELETE CASCADE,
                CONSTRAINT posts_category_id_fkey FOREIGN KEY (category_id)
                    REFERENCES categories(id) ON DELETE RESTRICT
            );
            CREATE INDEX IF NOT EXISTS idx_posts_feed
                ON posts(status, post_type, created_at DESC, id DESC);
            CREATE INDEX IF NOT EXISTS idx_posts_author
                ON posts(author_id, created_at DESC, id DESC);
            "#,
            "DROP TABLE IF EXISTS posts;",
        ),
        Migration::new(
            7,
            "Create transactions table",
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id UUID PRIMARY KEY,
                post_id UUID NOT NULL,
                participant_id UUID NOT NULL,
                quantity_committed NUMERIC(12, 2) NOT NULL,
                status VARCHAR(16) NOT NULL DEFAULT 'pending',
                created_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT transactions_quantity_check CHECK (quantity_committed > 0),
                CONSTRAINT transactions_post_id_fkey FOREIGN KEY (post_id)
                    REFERENCES posts(id) ON DELETE CASCADE,
                CONSTRAINT transactions_participant_id_fkey FOREIGN KEY (participant_id)
                    REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_transactions_participant
                ON transactions(participant_id, created_at DESC, id DESC);
            CREATE INDEX IF NOT EXISTS idx_transactions_post
                ON transactions(post_id);
            "#,
            "DROP TABLE IF EXISTS transactions;",
        ),
    ]
}

/// Runs all pending storage migrations
pub async fn run_storage_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    migrator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creation() {
        let migration = Migration::new(1, "Test migration", "CREATE TABLE test", "DROP TABLE test");

        assert_eq!(migration.version, 1);
        assert_eq!(migration.description, "Test migration");
        assert_eq!(migration.up, "CREATE TABLE test");
        assert_eq!(migration.down, "DROP TABLE test");
    }

    #[test]
    fn test_storage_migrations_order() {
        let migrations = storage_migrations();

        assert!(!migrations.is_empty());

        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_storage_migrations_content() {
        let migrations = storage_migrations();

        for migration in migrations {
            assert!(!migration.description.is_empty());
            assert!(!migration.up.is_empty());
            assert!(!migration.down.is_empty());
        }
    }

    #[test]
    fn test_profile_tables_reference_users() {
        let migrations = storage_migrations();

        for table in ["donees", "donors", "institutions"] {
            let migration = migrations
                .iter()
                .find(|m| m.up.contains(table))
                .unwrap_or_else(|| panic!("no migration for {table}"));
            assert!(migration.up.contains("ON DELETE CASCADE"));
            assert!(migration.up.contains(&format!("{table}_user_id_key")));
        }
    }
}
