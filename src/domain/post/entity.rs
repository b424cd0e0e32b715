//! Post and category entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::error::DomainError;

/// Post identifier - UUID v4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::validation("post id must be a valid UUID"))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category identifier - UUID v4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

impl CategoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::validation("category id must be a valid UUID"))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a post: donees request goods, donors offer them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Request,
    Offer,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Offer => "offer",
        }
    }

    /// The type the feed's "available" column shows for this "mine" type
    pub fn opposite(&self) -> Self {
        match self {
            Self::Request => Self::Offer,
            Self::Offer => Self::Request,
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "request" => Ok(Self::Request),
            "offer" => Ok(Self::Offer),
            other => Err(DomainError::validation(format!(
                "post_type must be 'request' or 'offer', got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Visible in "available" feeds and open to transactions
    #[default]
    Active,
    /// A transaction on the post has been approved
    InProgress,
    Completed,
    Cancelled,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Category reference data, maintained by staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    /// Unique display name
    name: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a category from persisted fields
    pub fn restore(
        id: CategoryId,
        name: String,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_at,
        }
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Raw post fields as persisted
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: PostId,
    pub author_id: AccountId,
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub quantity: Decimal,
    pub post_type: PostType,
    pub status: PostStatus,
    pub is_campaign: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A donation post: a request for goods or an offer of goods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    /// Always the authenticated creator, never taken from a payload
    author_id: AccountId,
    title: String,
    description: String,
    category_id: CategoryId,
    /// Amount of goods requested or offered, strictly positive
    quantity: Decimal,
    post_type: PostType,
    status: PostStatus,
    /// Institution campaigns only; forced false for person posts
    is_campaign: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: AccountId,
        title: impl Into<String>,
        description: impl Into<String>,
        category_id: CategoryId,
        quantity: Decimal,
        post_type: PostType,
        is_campaign: bool,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: PostId::new(),
            author_id,
            title: title.into(),
            description: description.into(),
            category_id,
            quantity,
            post_type,
            status: PostStatus::Active,
            is_campaign,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a post from persisted fields, verbatim
    pub fn restore(record: PostRecord) -> Self {
        Self {
            id: record.id,
            author_id: record.author_id,
            title: record.title,
            description: record.description,
            category_id: record.category_id,
            quantity: record.quantity,
            post_type: record.post_type,
            status: record.status,
            is_campaign: record.is_campaign,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn author_id(&self) -> AccountId {
        self.author_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn post_type(&self) -> PostType {
        self.post_type
    }

    pub fn status(&self) -> PostStatus {
        self.status
    }

    pub fn is_campaign(&self) -> bool {
        self.is_campaign
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Transitions

    /// Author cancels an active post
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if self.status != PostStatus::Active {
            return Err(DomainError::validation(format!(
                "only active posts can be cancelled, post is {}",
                self.status.as_str()
            )));
        }
        self.status = PostStatus::Cancelled;
        self.touch();
        Ok(())
    }

    /// First approved transaction takes the post out of the available feeds
    pub fn begin_progress(&mut self) -> Result<(), DomainError> {
        if self.status != PostStatus::Active {
            return Err(DomainError::validation(format!(
                "only active posts can move to in_progress, post is {}",
                self.status.as_str()
            )));
        }
        self.status = PostStatus::InProgress;
        self.touch();
        Ok(())
    }

    /// A completed transaction closes the post
    pub fn complete(&mut self) -> Result<(), DomainError> {
        if self.status != PostStatus::InProgress {
            return Err(DomainError::validation(format!(
                "only in_progress posts can be completed, post is {}",
                self.status.as_str()
            )));
        }
        self.status = PostStatus::Completed;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
