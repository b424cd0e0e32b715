//! Authentication API endpoints
//!
//! Registration, login, token refresh and identity lookup.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{
    FieldErrors, InstitutionRegistrationForm, PersonRegistrationForm, Profile, Role, UserAccount,
};
use crate::infrastructure::auth::SessionGrant;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register/person", post(register_person))
        .route("/register/institution", post(register_institution))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(current_identity))
}

/// Account response (safe to expose)
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub is_staff: bool,
    pub created_at: String,
}

impl From<&UserAccount> for AccountResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id().to_string(),
            email: account.email().to_string(),
            phone: account.phone().to_string(),
            status: account.status().as_str().to_string(),
            is_staff: account.is_staff(),
            created_at: account.created_at().to_rfc3339(),
        }
    }
}

/// The id/email pair echoed back by login and refresh
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Session response returned by login and refresh
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub account: AccountSummary,
    pub role: Role,
    pub redirect_target: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<SessionGrant> for SessionResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            account: AccountSummary {
                id: grant.account.id().to_string(),
                email: grant.account.email().to_string(),
            },
            role: grant.role,
            redirect_target: grant.redirect_target.to_string(),
            access_token: grant.tokens.access_token,
            refresh_token: grant.tokens.refresh_token,
        }
    }
}

/// Current identity response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub account: AccountResponse,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

/// Register a person account as a donee or donor
///
/// POST /auth/register/person
pub async fn register_person(
    State(state): State<AppState>,
    Json(form): Json<PersonRegistrationForm>,
) -> Result<Json<AccountResponse>, ApiError> {
    debug!(email = %form.email, user_type = %form.user_type, "Registering person account");

    let account = state
        .registration_service
        .register_person(form)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(AccountResponse::from(&account)))
}

/// Register an institution account
///
/// POST /auth/register/institution
pub async fn register_institution(
    State(state): State<AppState>,
    Json(form): Json<InstitutionRegistrationForm>,
) -> Result<Json<AccountResponse>, ApiError> {
    debug!(email = %form.email, "Registering institution account");

    let account = state
        .registration_service
        .register_institution(form)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(AccountResponse::from(&account)))
}

/// Login with email and password
///
/// POST /auth/login
///
/// Returns the access/refresh pair and the role-directed redirect target.
/// Every failure produces the same generic 401 body.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let missing = missing_credentials(&request.email, &request.password);
    if !missing.is_empty() {
        return Err(ApiError::bad_request("one or more fields failed validation")
            .with_fields(missing));
    }

    debug!("Login attempt");

    let grant = state
        .auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(SessionResponse::from(grant)))
}

/// Exchange a refresh token for a new pair
///
/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let grant = state
        .auth_service
        .refresh(&request.refresh_token)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(SessionResponse::from(grant)))
}

/// Get the current authenticated account with its resolved role
///
/// GET /auth/me
pub async fn current_identity(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
) -> Result<Json<MeResponse>, ApiError> {
    let overview = state
        .auth_service
        .current_identity(&account)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(MeResponse {
        account: AccountResponse::from(&account),
        role: overview.role,
        profile: overview.profile,
    }))
}

fn missing_credentials(email: &str, password: &str) -> FieldErrors {
    let mut fields = FieldErrors::new();
    if email.trim().is_empty() {
        fields
            .entry("email".to_string())
            .or_default()
            .push("This field is required".to_string());
    }
    if password.is_empty() {
        fields
            .entry("password".to_string())
            .or_default()
            .push("This field is required".to_string());
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::TokenPair;

    fn test_account() -> UserAccount {
        UserAccount::new("ana@example.com", "5512345678", "hashed_password")
    }

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{"email": "ana@example.com", "password": "Sup3rSecret"}"#;

        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.email, "ana@example.com");
        assert_eq!(request.password, "Sup3rSecret");
    }

    #[test]
    fn test_missing_credentials_collects_both() {
        let fields = missing_credentials("  ", "");
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));

        let fields = missing_credentials("ana@example.com", "Sup3rSecret");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_account_response_from() {
        let account = test_account();
        let response = AccountResponse::from(&account);

        assert_eq!(response.email, "ana@example.com");
        assert_eq!(response.phone, "5512345678");
        assert_eq!(response.status, "active");
        assert!(!response.is_staff);
    }

    #[test]
    fn test_account_response_omits_password_hash() {
        let response = AccountResponse::from(&test_account());
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("password"));
        assert!(!json.contains("hashed_password"));
    }

    #[test]
    fn test_session_response_shape() {
        let account = test_account();
        let grant = SessionGrant {
            role: Role::Donee,
            redirect_target: Role::Donee.redirect_target(),
            tokens: TokenPair {
                access_token: "access.jwt".to_string(),
                refresh_token: "refresh.jwt".to_string(),
            },
            account,
        };

        let response = SessionResponse::from(grant);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"role\":\"donee\""));
        assert!(json.contains("\"redirect_target\":\"/donee_feed\""));
        assert!(json.contains("\"access_token\":\"access.jwt\""));
        assert!(json.contains("\"refresh_token\":\"refresh.jwt\""));
        assert!(json.contains("\"account\":{"));
    }

    #[test]
    fn test_me_response_without_profile() {
        let account = test_account();
        let response = MeResponse {
            account: AccountResponse::from(&account),
            role: Role::Unknown,
            profile: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"role\":\"unknown\""));
        assert!(!json.contains("\"profile\""));
    }
}
