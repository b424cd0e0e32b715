//! Role-directed feed endpoint

use axum::extract::State;
use serde::Serialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::api::v1::posts::PostResponse;
use crate::domain::Role;

/// The two result sets of a feed request, newest first
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub role: Role,
    /// Posts authored by the caller, all statuses
    pub mine: Vec<PostResponse>,
    /// Active posts by other accounts the caller can match with
    pub available: Vec<PostResponse>,
}

/// GET /v1/feed
///
/// Donees see their requests plus others' offers, donors the mirror
/// image, institutions both directions. Accounts without a profile get
/// a 403 with the incomplete-profile code.
pub async fn get_feed(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
) -> Result<Json<FeedResponse>, ApiError> {
    let feed = state
        .feed_service
        .feed_for(&account)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(FeedResponse {
        role: feed.role,
        mine: feed.mine.iter().map(PostResponse::from).collect(),
        available: feed.available.iter().map(PostResponse::from).collect(),
    }))
}
