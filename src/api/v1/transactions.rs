//! Transaction lifecycle endpoints

use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Transaction, TransactionId, TransactionStatus};

/// Transaction response
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub post_id: String,
    pub participant_id: String,
    pub quantity_committed: Decimal,
    pub status: TransactionStatus,
    pub created_at: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id().to_string(),
            post_id: transaction.post_id().to_string(),
            participant_id: transaction.participant_id().to_string(),
            quantity_committed: transaction.quantity_committed(),
            status: transaction.status(),
            created_at: transaction.created_at().to_rfc3339(),
        }
    }
}

/// Both directions of the caller's commitments
#[derive(Debug, Serialize)]
pub struct TransactionsOverviewResponse {
    /// Commitments the caller made against others' posts
    pub outgoing: Vec<TransactionResponse>,
    /// Commitments others made against the caller's posts
    pub incoming: Vec<TransactionResponse>,
}

/// GET /v1/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
) -> Result<Json<TransactionsOverviewResponse>, ApiError> {
    let overview = state
        .transaction_service
        .overview_for(&account)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TransactionsOverviewResponse {
        outgoing: overview.outgoing.iter().map(TransactionResponse::from).collect(),
        incoming: overview.incoming.iter().map(TransactionResponse::from).collect(),
    }))
}

/// POST /v1/transactions/{transaction_id}/approve
///
/// Post author only. The first approval moves the post to in progress.
pub async fn approve_transaction(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    debug!(account_id = %account.id(), transaction_id = %transaction_id, "Approving transaction");

    let id = TransactionId::parse(&transaction_id).map_err(ApiError::from)?;

    let transaction = state
        .transaction_service
        .approve(&account, id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TransactionResponse::from(&transaction)))
}

/// POST /v1/transactions/{transaction_id}/reject
pub async fn reject_transaction(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    debug!(account_id = %account.id(), transaction_id = %transaction_id, "Rejecting transaction");

    let id = TransactionId::parse(&transaction_id).map_err(ApiError::from)?;

    let transaction = state
        .transaction_service
        .reject(&account, id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TransactionResponse::from(&transaction)))
}

/// POST /v1/transactions/{transaction_id}/complete
///
/// Confirms delivery; completes both the transaction and its post.
pub async fn complete_transaction(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    debug!(account_id = %account.id(), transaction_id = %transaction_id, "Completing transaction");

    let id = TransactionId::parse(&transaction_id).map_err(ApiError::from)?;

    let transaction = state
        .transaction_service
        .complete(&account, id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TransactionResponse::from(&transaction)))
}
