//! Transaction entity: a commitment against a post

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::error::DomainError;
use crate::domain::post::PostId;

/// Transaction identifier - UUID v4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::validation("transaction id must be a valid UUID"))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting the post author's decision
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

/// Raw transaction fields as persisted
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub post_id: PostId,
    pub participant_id: AccountId,
    pub quantity_committed: Decimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// A second user's commitment against a post
///
/// The participant is never the post's author; that rule is enforced at
/// creation time by the transaction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    post_id: PostId,
    participant_id: AccountId,
    /// Amount committed, strictly positive
    quantity_committed: Decimal,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(post_id: PostId, participant_id: AccountId, quantity_committed: Decimal) -> Self {
        Self {
            id: TransactionId::new(),
            post_id,
            participant_id,
            quantity_committed,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a transaction from persisted fields, verbatim
    pub fn restore(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            post_id: record.post_id,
            participant_id: record.participant_id,
            quantity_committed: record.quantity_committed,
            status: record.status,
            created_at: record.created_at,
        }
    }

    // Getters

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn participant_id(&self) -> AccountId {
        self.participant_id
    }

    pub fn quantity_committed(&self) -> Decimal {
        self.quantity_committed
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Transitions

    /// Post author accepts the commitment
    pub fn approve(&mut self) -> Result<(), DomainError> {
        if self.status != TransactionStatus::Pending {
            return Err(DomainError::validation(format!(
                "only pending transactions can be approved, transaction is {}",
                self.status.as_str()
            )));
        }
        self.status = TransactionStatus::Approved;
        Ok(())
    }

    /// Post author declines the commitment
    pub fn reject(&mut self) -> Result<(), DomainError> {
        if self.status != TransactionStatus::Pending {
            return Err(DomainError::validation(format!(
                "only pending transactions can be rejected, transaction is {}",
                self.status.as_str()
            )));
        }
        self.status = TransactionStatus::Rejected;
        Ok(())
    }

    /// Post author confirms delivery of an approved commitment
    pub fn complete(&mut self) -> Result<(), DomainError> {
        if self.status != TransactionStatus::Approved {
            return Err(DomainError::validation(format!(
                "only approved transactions can be completed, transaction is {}",
                self.status.as_str()
            )));
        }
        self.status = TransactionStatus::Completed;
        Ok(())
    }
}
