//! Post endpoints - creation, lookup, cancellation and commitments

use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::api::v1::transactions::TransactionResponse;
use crate::domain::{Post, PostId, PostStatus, PostSubmission, PostType};

/// Post response
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub quantity: Decimal,
    pub post_type: PostType,
    pub status: PostStatus,
    pub is_campaign: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id().to_string(),
            author_id: post.author_id().to_string(),
            title: post.title().to_string(),
            description: post.description().to_string(),
            category_id: post.category_id().to_string(),
            quantity: post.quantity(),
            post_type: post.post_type(),
            status: post.status(),
            is_campaign: post.is_campaign(),
            created_at: post.created_at().to_rfc3339(),
            updated_at: post.updated_at().to_rfc3339(),
        }
    }
}

/// Request to commit against a post
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub quantity: Decimal,
}

/// POST /v1/posts
///
/// The acting account is always the author; its role decides the post
/// type. Donee submissions become requests, donor submissions offers,
/// institutions choose.
pub async fn create_post(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Json(submission): Json<PostSubmission>,
) -> Result<Json<PostResponse>, ApiError> {
    debug!(author_id = %account.id(), title = %submission.title, "Creating post");

    let post = state
        .post_service
        .create_post(&account, submission)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PostResponse::from(&post)))
}

/// GET /v1/posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = PostId::parse(&post_id).map_err(ApiError::from)?;

    let post = state
        .post_service
        .get_required(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PostResponse::from(&post)))
}

/// POST /v1/posts/{post_id}/cancel
///
/// Author only; the post must still be active.
pub async fn cancel_post(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    debug!(account_id = %account.id(), post_id = %post_id, "Cancelling post");

    let id = PostId::parse(&post_id).map_err(ApiError::from)?;

    let post = state
        .post_service
        .cancel_post(&account, id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PostResponse::from(&post)))
}

/// POST /v1/posts/{post_id}/transactions
///
/// Opens a pending commitment against somebody else's active post.
pub async fn create_transaction(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(post_id): Path<String>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    debug!(account_id = %account.id(), post_id = %post_id, "Opening transaction");

    let id = PostId::parse(&post_id).map_err(ApiError::from)?;

    let transaction = state
        .transaction_service
        .commit(&account, id, request.quantity)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TransactionResponse::from(&transaction)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, CategoryId};

    fn test_post() -> Post {
        Post::new(
            AccountId::new(),
            "Winter blankets",
            "Twenty blankets for the shelter",
            CategoryId::new(),
            Decimal::from(20),
            PostType::Request,
            false,
        )
    }

    #[test]
    fn test_post_response_from() {
        let post = test_post();
        let response = PostResponse::from(&post);

        assert_eq!(response.id, post.id().to_string());
        assert_eq!(response.title, "Winter blankets");
        assert_eq!(response.post_type, PostType::Request);
        assert_eq!(response.status, PostStatus::Active);
        assert!(!response.is_campaign);
    }

    #[test]
    fn test_post_response_serialization() {
        let response = PostResponse::from(&test_post());
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"post_type\":\"request\""));
        assert!(json.contains("\"status\":\"active\""));
        assert!(json.contains("\"is_campaign\":false"));
    }

    #[test]
    fn test_submission_deserialization_defaults() {
        let json = format!(
            r#"{{"title": "Blankets", "description": "Twenty", "category_id": "{}", "quantity": "20"}}"#,
            CategoryId::new()
        );

        let submission: PostSubmission = serde_json::from_str(&json).unwrap();
        assert!(submission.post_type.is_none());
        assert!(submission.is_campaign.is_none());
    }

    #[test]
    fn test_submission_deserialization_full() {
        let json = format!(
            r#"{{"title": "Blankets", "description": "Twenty", "category_id": "{}",
                 "quantity": "20", "post_type": "offer", "is_campaign": true}}"#,
            CategoryId::new()
        );

        let submission: PostSubmission = serde_json::from_str(&json).unwrap();
        assert_eq!(submission.post_type, Some(PostType::Offer));
        assert_eq!(submission.is_campaign, Some(true));
    }

    #[test]
    fn test_create_transaction_request_deserialization() {
        let json = r#"{"quantity": "5"}"#;

        let request: CreateTransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.quantity, Decimal::from(5));
    }
}
