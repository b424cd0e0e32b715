//! User account entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Account identifier - UUID v4, generated server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier from its textual form (path parameters)
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::validation("account id must be a valid UUID"))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is active and can log in
    #[default]
    Active,
    /// Account is disabled; login is refused
    Inactive,
}

impl AccountStatus {
    /// Check if the account can log in
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Raw account fields as persisted, used by stores to rehydrate the entity
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: AccountId,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub status: AccountStatus,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// User account entity for authentication
///
/// Holds credentials and flags only; the actor's role lives in the profile
/// tables and is resolved separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique identifier for the account
    id: AccountId,
    /// Login email, stored lowercased, unique
    email: String,
    /// Contact phone, digits only, unique
    phone: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Current status of the account
    status: AccountStatus,
    /// Staff members manage reference data
    is_staff: bool,
    /// Superusers bypass all permission checks
    is_superuser: bool,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Create a new active, non-staff account. The email is lowercased.
    pub fn new(
        email: impl Into<String>,
        phone: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            email: email.into().to_lowercase(),
            phone: phone.into(),
            password_hash: password_hash.into(),
            status: AccountStatus::Active,
            is_staff: false,
            is_superuser: false,
            created_at: Utc::now(),
        }
    }

    /// Rebuild an account from persisted fields, verbatim
    pub fn restore(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            phone: record.phone,
            password_hash: record.password_hash,
            status: record.status,
            is_staff: record.is_staff,
            is_superuser: record.is_superuser,
            created_at: record.created_at,
        }
    }

    // Getters

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Status checks

    /// Check if the account is active and can log in
    pub fn is_active(&self) -> bool {
        self.status.can_login()
    }

    // Mutators

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
    }

    /// Update the status
    pub fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
    }

    /// Grant staff rights (reference-data management)
    pub fn grant_staff(&mut self) {
        self.is_staff = true;
    }

    /// Grant superuser rights
    pub fn grant_superuser(&mut self) {
        self.is_superuser = true;
    }
}
