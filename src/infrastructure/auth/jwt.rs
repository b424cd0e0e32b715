//! JWT access/refresh token pairs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::account::{AccountId, UserAccount};
use crate::domain::profile::Role;
use crate::domain::DomainError;

/// What a token is good for; access tokens authorize requests, refresh
/// tokens only mint new pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Login email at issue time
    pub email: String,
    /// Resolved role at issue time
    pub role: Role,
    /// Access or refresh
    pub token_use: TokenUse,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    fn new(account: &UserAccount, role: Role, token_use: TokenUse, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(ttl_minutes);

        Self {
            sub: account.id().to_string(),
            email: account.email().to_string(),
            role,
            token_use,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get the account ID from the claims
    pub fn account_id(&self) -> Result<AccountId, DomainError> {
        AccountId::parse(&self.sub)
    }
}

/// An access/refresh pair as handed to clients
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Configuration for token issuing
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret key for HS256 signing
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime in minutes
    pub refresh_ttl_minutes: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, access_ttl_minutes: i64, refresh_ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_minutes,
            refresh_ttl_minutes,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_ttl_minutes: 60,
            // 14 days
            refresh_ttl_minutes: 14 * 24 * 60,
        }
    }
}

/// Trait for issuing and validating token pairs
pub trait TokenIssuer: Send + Sync + Debug {
    /// Issue a fresh access/refresh pair for an account
    fn issue_pair(&self, account: &UserAccount, role: Role) -> Result<TokenPair, DomainError>;

    /// Validate an access token and return its claims
    fn validate_access(&self, token: &str) -> Result<TokenClaims, DomainError>;

    /// Validate a refresh token and return its claims
    fn validate_refresh(&self, token: &str) -> Result<TokenClaims, DomainError>;
}

/// HS256 token service from a shared secret
#[derive(Clone)]
pub struct JwtTokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("access_ttl_minutes", &self.config.access_ttl_minutes)
            .field("refresh_ttl_minutes", &self.config.refresh_ttl_minutes)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtTokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(TokenConfig::default())
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, DomainError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }

    fn decode_and_check(&self, token: &str, expected: TokenUse) -> Result<TokenClaims, DomainError> {
        let validation = Validation::default();

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| DomainError::invalid_credentials())?;

        if token_data.claims.token_use != expected {
            return Err(DomainError::invalid_credentials());
        }

        Ok(token_data.claims)
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue_pair(&self, account: &UserAccount, role: Role) -> Result<TokenPair, DomainError> {
        let access = TokenClaims::new(
            account,
            role,
            TokenUse::Access,
            self.config.access_ttl_minutes,
        );
        let refresh = TokenClaims::new(
            account,
            role,
            TokenUse::Refresh,
            self.config.refresh_ttl_minutes,
        );

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
        })
    }

    fn validate_access(&self, token: &str) -> Result<TokenClaims, DomainError> {
        self.decode_and_check(token, TokenUse::Access)
    }

    fn validate_refresh(&self, token: &str) -> Result<TokenClaims, DomainError> {
        self.decode_and_check(token, TokenUse::Refresh)
    }
}
