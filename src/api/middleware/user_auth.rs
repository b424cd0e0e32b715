//! Bearer authentication extractors

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::UserAccount;

/// Extractor that requires a valid access token
///
/// Expects `Authorization: Bearer <access token>`. The account is loaded
/// fresh on every request, so deactivation takes effect immediately and
/// refresh tokens are rejected by their `token_use` claim.
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserAccount);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!("Validating bearer token");

        let (account, _claims) = state
            .auth_service
            .authenticate_bearer(&token)
            .await
            .map_err(ApiError::from)?;

        Ok(RequireUser(account))
    }
}

/// Extractor that additionally requires the staff flag
///
/// Staff accounts manage reference data such as categories.
#[derive(Debug, Clone)]
pub struct RequireStaff(pub UserAccount);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(account) = RequireUser::from_request_parts(parts, state).await?;

        if !account.is_staff() {
            return Err(ApiError::forbidden("Staff access required"));
        }

        Ok(RequireStaff(account))
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide an access token via 'Authorization: Bearer <token>'",
    ))
}
