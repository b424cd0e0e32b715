use std::sync::Arc;

use serde::Serialize;

use crate::domain::{DomainError, IdentityStore, Profile, Role, UserAccount};
use crate::infrastructure::auth::{PasswordHasher, TokenClaims, TokenIssuer, TokenPair};

/// Successful login or refresh. Carries everything the caller needs to
/// continue the session: the account, its resolved role, where the client
/// should navigate next and a fresh token pair.
#[derive(Debug)]
pub struct SessionGrant {
    pub account: UserAccount,
    pub role: Role,
    pub redirect_target: &'static str,
    pub tokens: TokenPair,
}

/// Verifies credentials and manages bearer sessions.
///
/// Every failure path of [`login`](AuthService::login) collapses into the
/// same [`DomainError::InvalidCredentials`] so a caller cannot probe which
/// of email or password was wrong.
pub struct AuthService {
    identity: Arc<dyn IdentityStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            identity,
            hasher,
            tokens,
        }
    }

    /// Authenticates by email and password and issues a token pair.
    ///
    /// Email matching is case-insensitive. Unknown email, deactivated
    /// account and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionGrant, DomainError> {
        let normalized = email.trim().to_lowercase();

        let account = self
            .identity
            .get_account_by_email(&normalized)
            .await?
            .ok_or_else(DomainError::invalid_credentials)?;

        if !account.is_active() {
            return Err(DomainError::invalid_credentials());
        }

        if !self.hasher.verify(password, account.password_hash()) {
            return Err(DomainError::invalid_credentials());
        }

        self.grant(account).await
    }

    /// Exchanges a refresh token for a fresh pair.
    ///
    /// The account is re-loaded and its role re-resolved, so a deactivated
    /// account loses access as soon as its access token expires.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionGrant, DomainError> {
        let claims = self.tokens.validate_refresh(refresh_token)?;
        let account_id = claims.account_id()?;

        let account = self
            .identity
            .get_account(account_id)
            .await?
            .ok_or_else(DomainError::invalid_credentials)?;

        if !account.is_active() {
            return Err(DomainError::invalid_credentials());
        }

        self.grant(account).await
    }

    /// Resolves a bearer access token to its live account.
    ///
    /// Used by the request extractor. Rejects refresh tokens, tokens for
    /// deleted accounts and tokens for deactivated accounts.
    pub async fn authenticate_bearer(
        &self,
        token: &str,
    ) -> Result<(UserAccount, TokenClaims), DomainError> {
        let claims = self.tokens.validate_access(token)?;
        let account_id = claims.account_id()?;

        let account = self
            .identity
            .get_account(account_id)
            .await?
            .ok_or_else(DomainError::invalid_credentials)?;

        if !account.is_active() {
            return Err(DomainError::invalid_credentials());
        }

        Ok((account, claims))
    }

    /// Returns the account's resolved role together with its profile, if
    /// one exists yet.
    pub async fn current_identity(
        &self,
        account: &UserAccount,
    ) -> Result<IdentityOverview, DomainError> {
        let profile = self.identity.get_profile(account.id()).await?;
        let role = profile.as_ref().map(Profile::role).unwrap_or(Role::Unknown);

        Ok(IdentityOverview { role, profile })
    }

    async fn grant(&self, account: UserAccount) -> Result<SessionGrant, DomainError> {
        let role = self.identity.resolve_role(account.id()).await?;
        let tokens = self.tokens.issue_pair(&account, role)?;

        Ok(SessionGrant {
            redirect_target: role.redirect_target(),
            account,
            role,
            tokens,
        })
    }
}

/// Role plus optional profile of an authenticated account.
#[derive(Debug, Serialize)]
pub struct IdentityOverview {
    pub role: Role,
    pub profile: Option<Profile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockIdentityStore, PersonKind, PersonProfile};
    use crate::infrastructure::auth::{Argon2Hasher, JwtTokenService};

    struct Fixture {
        service: AuthService,
        identity: Arc<MockIdentityStore>,
    }

    fn fixture() -> Fixture {
        let identity = Arc::new(MockIdentityStore::new());
        let service = AuthService::new(
            identity.clone(),
            Arc::new(Argon2Hasher::new()),
            Arc::new(JwtTokenService::with_default_config()),
        );
        Fixture { service, identity }
    }

    async fn seed_donor(fixture: &Fixture, email: &str, password: &str) -> UserAccount {
        let hash = Argon2Hasher::new().hash(password).unwrap();
        let account = UserAccount::new(email.to_string(), "5511112222".to_string(), hash);
        let person = PersonProfile::new(
            account.id(),
            "Carlos".to_string(),
            "Gomez".to_string(),
            "Rios".to_string(),
            "GOMC900101HDFRRL09".to_string(),
            "CDMX".to_string(),
            "CDMX".to_string(),
        );

        fixture
            .identity
            .register(account, Profile::person(PersonKind::Donor, person))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_resolves_role_and_redirect() {
        let fixture = fixture();
        seed_donor(&fixture, "carlos@example.com", "Sup3rSecret").await;

        let grant = fixture
            .service
            .login("Carlos@Example.com ", "Sup3rSecret")
            .await
            .unwrap();

        assert_eq!(grant.role, Role::Donor);
        assert_eq!(grant.redirect_target, "/donor_feed");
        assert!(!grant.tokens.access_token.is_empty());
        assert!(!grant.tokens.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let fixture = fixture();
        seed_donor(&fixture, "carlos@example.com", "Sup3rSecret").await;

        let unknown_email = fixture
            .service
            .login("nobody@example.com", "Sup3rSecret")
            .await
            .unwrap_err();
        let wrong_password = fixture
            .service
            .login("carlos@example.com", "not-the-password")
            .await
            .unwrap_err();

        assert!(matches!(unknown_email, DomainError::InvalidCredentials));
        assert!(matches!(wrong_password, DomainError::InvalidCredentials));
        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_login_rejects_deactivated_account() {
        let fixture = fixture();
        let account = seed_donor(&fixture, "carlos@example.com", "Sup3rSecret").await;
        fixture.identity.deactivate(account.id()).await;

        let error = fixture
            .service
            .login("carlos@example.com", "Sup3rSecret")
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_refresh_issues_a_new_pair() {
        let fixture = fixture();
        seed_donor(&fixture, "carlos@example.com", "Sup3rSecret").await;

        let grant = fixture
            .service
            .login("carlos@example.com", "Sup3rSecret")
            .await
            .unwrap();
        let refreshed = fixture
            .service
            .refresh(&grant.tokens.refresh_token)
            .await
            .unwrap();

        assert_eq!(refreshed.account.id(), grant.account.id());
        assert_eq!(refreshed.role, Role::Donor);
    }

    #[tokio::test]
    async fn test_refresh_rejects_an_access_token() {
        let fixture = fixture();
        seed_donor(&fixture, "carlos@example.com", "Sup3rSecret").await;

        let grant = fixture
            .service
            .login("carlos@example.com", "Sup3rSecret")
            .await
            .unwrap();
        let error = fixture
            .service
            .refresh(&grant.tokens.access_token)
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_bearer_authentication_loads_the_live_account() {
        let fixture = fixture();
        let account = seed_donor(&fixture, "carlos@example.com", "Sup3rSecret").await;

        let grant = fixture
            .service
            .login("carlos@example.com", "Sup3rSecret")
            .await
            .unwrap();
        let (loaded, claims) = fixture
            .service
            .authenticate_bearer(&grant.tokens.access_token)
            .await
            .unwrap();

        assert_eq!(loaded.id(), account.id());
        assert_eq!(claims.role, Role::Donor);
    }

    #[tokio::test]
    async fn test_bearer_authentication_rejects_garbage() {
        let fixture = fixture();

        let error = fixture
            .service
            .authenticate_bearer("not-a-token")
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_current_identity_reports_unknown_without_profile() {
        let fixture = fixture();
        let hash = Argon2Hasher::new().hash("Sup3rSecret").unwrap();
        let account = UserAccount::new(
            "bare@example.com".to_string(),
            "5500000000".to_string(),
            hash,
        );
        let account = fixture.identity.create_account(account).await.unwrap();

        let overview = fixture.service.current_identity(&account).await.unwrap();

        assert_eq!(overview.role, Role::Unknown);
        assert!(overview.profile.is_none());
    }
}
