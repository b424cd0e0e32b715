//! API error envelope
//!
//! Every failure leaves the service in the same JSON shape:
//! `{"error": {"message", "type", "param", "code", "fields"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{DomainError, FieldErrors};

/// Coarse error classes exposed in the envelope's `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    PermissionError,
    NotFoundError,
    ConflictError,
    ServerError,
    ServiceUnavailableError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::PermissionError => write!(f, "permission_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::ServerError => write!(f, "server_error"),
            Self::ServiceUnavailableError => write!(f, "service_unavailable_error"),
        }
    }
}

/// Top-level error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    /// Field or parameter the error refers to, when there is exactly one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Stable machine-readable tag (`invalid_credentials`, `duplicate_resource`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Per-field messages from form validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                    fields: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    /// Attach per-field validation messages
    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        if !fields.is_empty() {
            self.response.error.fields = Some(fields);
        }
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorType::InvalidRequestError,
            message,
        )
    }

    /// Authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ApiErrorType::AuthenticationError,
            message,
        )
    }

    /// Permission error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ApiErrorType::PermissionError, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// Unique-resource conflict
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorType::ConflictError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ServerError,
            message,
        )
    }

    /// Service unavailable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }

    /// The canonical login failure. Identical for every failed factor so
    /// callers cannot probe which of email or password was wrong.
    pub fn invalid_credentials() -> Self {
        Self::unauthorized("Invalid email or password").with_code("invalid_credentials")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message, fields } => {
                Self::bad_request(message).with_fields(fields)
            }
            DomainError::Duplicate { field, message } => Self::conflict(message)
                .with_param(field)
                .with_code("duplicate_resource"),
            DomainError::IncompleteProfile { message } => {
                Self::forbidden(message).with_code("incomplete_profile")
            }
            DomainError::InvalidCredentials => Self::invalid_credentials(),
            DomainError::Forbidden { message } => Self::forbidden(message),
            DomainError::Configuration { message }
            | DomainError::Storage { message }
            | DomainError::Internal { message } => {
                // Detail goes to the log, never the client
                error!("internal error: {}", message);
                Self::internal("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Invalid quantity");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.response.error.error_type,
            ApiErrorType::InvalidRequestError
        );
        assert_eq!(err.response.error.message, "Invalid quantity");
    }

    #[test]
    fn test_api_error_with_param_and_code() {
        let err = ApiError::conflict("An account with this email already exists")
            .with_param("email")
            .with_code("duplicate_resource");

        assert_eq!(err.response.error.param, Some("email".to_string()));
        assert_eq!(err.response.error.code, Some("duplicate_resource".to_string()));
    }

    #[test]
    fn test_validation_error_carries_fields() {
        let mut fields = FieldErrors::new();
        fields
            .entry("curp".to_string())
            .or_default()
            .push("CURP format is invalid".to_string());

        let api_err: ApiError = DomainError::invalid_form(fields).into();

        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        let fields = api_err.response.error.fields.unwrap();
        assert_eq!(fields["curp"], vec!["CURP format is invalid"]);
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let api_err: ApiError = DomainError::validation("quantity must be positive").into();

        assert!(api_err.response.error.fields.is_none());
        let json = serde_json::to_string(&api_err.response).unwrap();
        assert!(!json.contains("\"fields\""));
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let api_err: ApiError =
            DomainError::duplicate("phone", "An account with this phone number already exists")
                .into();

        assert_eq!(api_err.status, StatusCode::CONFLICT);
        assert_eq!(api_err.response.error.param, Some("phone".to_string()));
        assert_eq!(
            api_err.response.error.code,
            Some("duplicate_resource".to_string())
        );
    }

    #[test]
    fn test_incomplete_profile_maps_to_forbidden() {
        let api_err: ApiError = DomainError::incomplete_profile().into();

        assert_eq!(api_err.status, StatusCode::FORBIDDEN);
        assert_eq!(
            api_err.response.error.code,
            Some("incomplete_profile".to_string())
        );
    }

    #[test]
    fn test_invalid_credentials_is_generic() {
        let from_unknown_email: ApiError = DomainError::invalid_credentials().into();
        let from_wrong_password: ApiError = DomainError::invalid_credentials().into();

        assert_eq!(from_unknown_email.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            serde_json::to_string(&from_unknown_email.response).unwrap(),
            serde_json::to_string(&from_wrong_password.response).unwrap()
        );
    }

    #[test]
    fn test_storage_detail_is_not_leaked() {
        let api_err: ApiError =
            DomainError::storage("connection refused at 10.0.0.3:5432").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.response.error.message, "Internal server error");
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::invalid_credentials();
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("authentication_error"));
        assert!(json.contains("invalid_credentials"));
        assert!(json.contains("Invalid email or password"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::bad_request("").status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("").status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("").status, StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("").status, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("").status, StatusCode::CONFLICT);
        assert_eq!(ApiError::internal("").status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::unavailable("").status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
