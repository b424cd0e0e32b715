//! Profile entities and the resolved role

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::error::DomainError;

/// Profile identifier - UUID v4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved role of an account
///
/// Every role-dependent decision (post policy, feed selection, login
/// redirect) consumes this enum; nothing infers the role ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donee,
    Donor,
    Institution,
    /// Account exists but has no profile yet
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donee => "donee",
            Self::Donor => "donor",
            Self::Institution => "institution",
            Self::Unknown => "unknown",
        }
    }

    /// Frontend landing route for the role, returned by login
    pub fn redirect_target(&self) -> &'static str {
        match self {
            Self::Donee => "/donee_feed",
            Self::Donor => "/donor_feed",
            Self::Institution => "/institution_feed",
            Self::Unknown => "/",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which of the two person tables a person profile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    Donee,
    Donor,
}

impl PersonKind {
    pub fn role(&self) -> Role {
        match self {
            Self::Donee => Role::Donee,
            Self::Donor => Role::Donor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donee => "donee",
            Self::Donor => "donor",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "donee" => Ok(Self::Donee),
            "donor" => Ok(Self::Donor),
            other => Err(DomainError::validation(format!(
                "user_type must be 'donee' or 'donor', got '{other}'"
            ))),
        }
    }
}

/// Raw person profile fields as persisted
#[derive(Debug, Clone)]
pub struct PersonProfileRecord {
    pub id: ProfileId,
    pub user_id: AccountId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub first_surname: String,
    pub second_surname: String,
    pub curp: String,
    pub city: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

/// Person profile shared by donees and donors (two separate tables)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonProfile {
    id: ProfileId,
    /// One-to-one link to the owning account
    user_id: AccountId,
    first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    middle_name: Option<String>,
    first_surname: String,
    second_surname: String,
    /// 18-character population registry key, stored uppercased, unique
    curp: String,
    city: String,
    state: String,
    created_at: DateTime<Utc>,
}

impl PersonProfile {
    /// Create a new person profile. The CURP is uppercased.
    pub fn new(
        user_id: AccountId,
        first_name: impl Into<String>,
        first_surname: impl Into<String>,
        second_surname: impl Into<String>,
        curp: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            id: ProfileId::new(),
            user_id,
            first_name: first_name.into(),
            middle_name: None,
            first_surname: first_surname.into(),
            second_surname: second_surname.into(),
            curp: curp.into().to_uppercase(),
            city: city.into(),
            state: state.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    /// Rebuild a profile from persisted fields, verbatim
    pub fn restore(record: PersonProfileRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            first_name: record.first_name,
            middle_name: record.middle_name,
            first_surname: record.first_surname,
            second_surname: record.second_surname,
            curp: record.curp,
            city: record.city,
            state: record.state,
            created_at: record.created_at,
        }
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn user_id(&self) -> AccountId {
        self.user_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> Option<&str> {
        self.middle_name.as_deref()
    }

    pub fn first_surname(&self) -> &str {
        &self.first_surname
    }

    pub fn second_surname(&self) -> &str {
        &self.second_surname
    }

    pub fn curp(&self) -> &str {
        &self.curp
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Full display name, skipping the optional middle name
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!(
                "{} {} {} {}",
                self.first_name, middle, self.first_surname, self.second_surname
            ),
            None => format!(
                "{} {} {}",
                self.first_name, self.first_surname, self.second_surname
            ),
        }
    }
}

/// Raw institution profile fields as persisted
#[derive(Debug, Clone)]
pub struct InstitutionProfileRecord {
    pub id: ProfileId,
    pub user_id: AccountId,
    pub name: String,
    pub rfc: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Institution profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstitutionProfile {
    id: ProfileId,
    /// One-to-one link to the owning account
    user_id: AccountId,
    /// Registered institution name, unique
    name: String,
    /// 12-13 character tax id, stored uppercased, unique
    rfc: String,
    city: String,
    state: String,
    address: String,
    created_at: DateTime<Utc>,
}

impl InstitutionProfile {
    /// Create a new institution profile. The RFC is uppercased.
    pub fn new(
        user_id: AccountId,
        name: impl Into<String>,
        rfc: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: ProfileId::new(),
            user_id,
            name: name.into(),
            rfc: rfc.into().to_uppercase(),
            city: city.into(),
            state: state.into(),
            address: address.into(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a profile from persisted fields, verbatim
    pub fn restore(record: InstitutionProfileRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            rfc: record.rfc,
            city: record.city,
            state: record.state,
            address: record.address,
            created_at: record.created_at,
        }
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn user_id(&self) -> AccountId {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rfc(&self) -> &str {
        &self.rfc
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A profile tagged with the table it lives in
///
/// Exactly one of these may exist per account; the registration path is the
/// only writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Profile {
    Donee(PersonProfile),
    Donor(PersonProfile),
    Institution(InstitutionProfile),
}

impl Profile {
    pub fn person(kind: PersonKind, profile: PersonProfile) -> Self {
        match kind {
            PersonKind::Donee => Self::Donee(profile),
            PersonKind::Donor => Self::Donor(profile),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Donee(_) => Role::Donee,
            Self::Donor(_) => Role::Donor,
            Self::Institution(_) => Role::Institution,
        }
    }

    pub fn user_id(&self) -> AccountId {
        match self {
            Self::Donee(p) | Self::Donor(p) => p.user_id(),
            Self::Institution(p) => p.user_id(),
        }
    }
}
