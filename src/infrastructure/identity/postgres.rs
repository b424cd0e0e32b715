//! PostgreSQL identity store implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::account::AccountRecord;
use crate::domain::profile::{InstitutionProfileRecord, PersonProfileRecord};
use crate::domain::{
    AccountId, AccountStatus, DomainError, IdentityStore, InstitutionProfile, PersonProfile,
    Profile, ProfileId, UserAccount,
};

/// PostgreSQL implementation of the identity store
///
/// `register` runs inside a single database transaction so the account row
/// and the profile row commit or roll back together. Unique violations are
/// mapped to field-level duplicate errors by constraint name.
#[derive(Debug, Clone)]
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_person(
        &self,
        table: &str,
        account_id: AccountId,
    ) -> Result<Option<PersonProfile>, DomainError> {
        let query = format!(
            r#"
            SELECT id, user_id, first_name, middle_name, first_surname, second_surname,
                   curp, city, state, created_at
            FROM {table}
            WHERE user_id = $1
            "#
        );

        let row = sqlx::query(&query)
            .bind(account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to get profile from {}: {}", table, e))
            })?;

        Ok(row.map(|row| row_to_person(&row)))
    }

    async fn find_institution(
        &self,
        account_id: AccountId,
    ) -> Result<Option<InstitutionProfile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, rfc, city, state, address, created_at
            FROM institutions
            WHERE user_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get institution profile: {}", e)))?;

        Ok(row.map(|row| row_to_institution(&row)))
    }
}

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn create_account(&self, account: UserAccount) -> Result<UserAccount, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, phone, password_hash, status, is_staff,
                               is_superuser, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.email())
        .bind(account.phone())
        .bind(account.password_hash())
        .bind(account.status().as_str())
        .bind(account.is_staff())
        .bind(account.is_superuser())
        .bind(account.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_storage_error(e, "Failed to create account"))?;

        Ok(account)
    }

    async fn register(
        &self,
        account: UserAccount,
        profile: Profile,
    ) -> Result<UserAccount, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, phone, password_hash, status, is_staff,
                               is_superuser, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.email())
        .bind(account.phone())
        .bind(account.password_hash())
        .bind(account.status().as_str())
        .bind(account.is_staff())
        .bind(account.is_superuser())
        .bind(account.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_storage_error(e, "Failed to create account"))?;

        match &profile {
            Profile::Donee(person) => insert_person(&mut tx, "donees", person).await?,
            Profile::Donor(person) => insert_person(&mut tx, "donors", person).await?,
            Profile::Institution(institution) => {
                sqlx::query(
                    r#"
                    INSERT INTO institutions (id, user_id, name, rfc, city, state,
                                              address, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(institution.id().as_uuid())
                .bind(institution.user_id().as_uuid())
                .bind(institution.name())
                .bind(institution.rfc())
                .bind(institution.city())
                .bind(institution.state())
                .bind(institution.address())
                .bind(institution.created_at())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_storage_error(e, "Failed to create institution profile"))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit registration: {}", e)))?;

        Ok(account)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, phone, password_hash, status, is_staff, is_superuser, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        Ok(row.map(|row| row_to_account(&row)))
    }

    async fn get_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, phone, password_hash, status, is_staff, is_superuser, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account by email: {}", e)))?;

        Ok(row.map(|row| row_to_account(&row)))
    }

    async fn phone_exists(&self, phone: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE phone = $1)")
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check phone: {}", e)))
    }

    async fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>, DomainError> {
        // Fixed precedence: donor, then donee, then institution.
        if let Some(person) = self.find_person("donors", account_id).await? {
            return Ok(Some(Profile::Donor(person)));
        }
        if let Some(person) = self.find_person("donees", account_id).await? {
            return Ok(Some(Profile::Donee(person)));
        }
        if let Some(institution) = self.find_institution(account_id).await? {
            return Ok(Some(Profile::Institution(institution)));
        }

        Ok(None)
    }

    async fn count_accounts(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count accounts: {}", e)))?;

        Ok(count as usize)
    }
}

async fn insert_person(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    table: &str,
    person: &PersonProfile,
) -> Result<(), DomainError> {
    let query = format!(
        r#"
        INSERT INTO {table} (id, user_id, first_name, middle_name, first_surname,
                             second_surname, curp, city, state, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#
    );

    sqlx::query(&query)
        .bind(person.id().as_uuid())
        .bind(person.user_id().as_uuid())
        .bind(person.first_name())
        .bind(person.middle_name())
        .bind(person.first_surname())
        .bind(person.second_surname())
        .bind(person.curp())
        .bind(person.city())
        .bind(person.state())
        .bind(person.created_at())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_storage_error(e, "Failed to create person profile"))?;

    Ok(())
}

fn row_to_account(row: &PgRow) -> UserAccount {
    let id: Uuid = row.get("id");
    let status: String = row.get("status");

    UserAccount::restore(AccountRecord {
        id: AccountId::from_uuid(id),
        email: row.get("email"),
        phone: row.get("phone"),
        password_hash: row.get("password_hash"),
        status: str_to_account_status(&status),
        is_staff: row.get("is_staff"),
        is_superuser: row.get("is_superuser"),
        created_at: row.get("created_at"),
    })
}

fn row_to_person(row: &PgRow) -> PersonProfile {
    let id: Uuid = row.get("id");
    let user_id: Uuid = row.get("user_id");

    PersonProfile::restore(PersonProfileRecord {
        id: ProfileId::from_uuid(id),
        user_id: AccountId::from_uuid(user_id),
        first_name: row.get("first_name"),
        middle_name: row.get("middle_name"),
        first_surname: row.get("first_surname"),
        second_surname: row.get("second_surname"),
        curp: row.get("curp"),
        city: row.get("city"),
        state: row.get("state"),
        created_at: row.get("created_at"),
    })
}

fn row_to_institution(row: &PgRow) -> InstitutionProfile {
    let id: Uuid = row.get("id");
    let user_id: Uuid = row.get("user_id");

    InstitutionProfile::restore(InstitutionProfileRecord {
        id: ProfileId::from_uuid(id),
        user_id: AccountId::from_uuid(user_id),
        name: row.get("name"),
        rfc: row.get("rfc"),
        city: row.get("city"),
        state: row.get("state"),
        address: row.get("address"),
        created_at: row.get("created_at"),
    })
}

fn str_to_account_status(s: &str) -> AccountStatus {
    match s {
        "inactive" => AccountStatus::Inactive,
        _ => AccountStatus::Active,
    }
}

/// Maps unique violations to field-level duplicate errors by constraint
/// name; everything else becomes a storage fault with context.
fn map_storage_error(error: sqlx::Error, context: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            let constraint = db.constraint().unwrap_or_default();

            let (field, message) = if constraint.contains("email") {
                ("email", "An account with this email already exists")
            } else if constraint.contains("phone") {
                ("phone", "An account with this phone number already exists")
            } else if constraint.contains("curp") {
                ("curp", "This CURP is already registered")
            } else if constraint.contains("rfc") {
                ("rfc", "This RFC is already registered")
            } else if constraint.contains("user_id") {
                ("user_id", "This account already has a profile")
            } else if constraint.contains("name") {
                ("name", "An institution with this name already exists")
            } else {
                return DomainError::duplicate("unknown", "This value is already taken");
            };

            return DomainError::duplicate(field, message);
        }
    }

    DomainError::storage(format!("{}: {}", context, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_status_conversion() {
        assert_eq!(str_to_account_status("active"), AccountStatus::Active);
        assert_eq!(str_to_account_status("inactive"), AccountStatus::Inactive);
        assert_eq!(str_to_account_status("unknown"), AccountStatus::Active);
    }
}
