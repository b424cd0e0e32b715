//! Identity store trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::account::{AccountId, UserAccount};
use crate::domain::profile::{Profile, Role};
use crate::domain::DomainError;

/// Store for accounts and their profiles
///
/// Accounts and profiles are one store because registration must write both
/// atomically: either the account and its profile land together or neither
/// does.
#[async_trait]
pub trait IdentityStore: Send + Sync + Debug {
    /// Create a bare account without a profile (bootstrap only; user-facing
    /// registration goes through [`IdentityStore::register`])
    async fn create_account(&self, account: UserAccount) -> Result<UserAccount, DomainError>;

    /// Atomically create an account together with exactly one profile.
    ///
    /// On any failure nothing is persisted. Unique violations (email, phone,
    /// CURP, RFC, institution name) surface as `DomainError::Duplicate`
    /// naming the field.
    async fn register(
        &self,
        account: UserAccount,
        profile: Profile,
    ) -> Result<UserAccount, DomainError>;

    /// Get an account by id
    async fn get_account(&self, id: AccountId) -> Result<Option<UserAccount>, DomainError>;

    /// Get an account by its lowercased email (login path)
    async fn get_account_by_email(&self, email: &str)
        -> Result<Option<UserAccount>, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_account_by_email(email).await?.is_some())
    }

    /// Check if a phone number is already registered
    async fn phone_exists(&self, phone: &str) -> Result<bool, DomainError>;

    /// Find the profile owned by an account.
    ///
    /// When an account somehow owns more than one profile, implementations
    /// must pick by the fixed precedence donor, donee, institution.
    async fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>, DomainError>;

    /// Resolve the account's role from profile presence.
    ///
    /// Precedence: donor, then donee, then institution; `Unknown` when the
    /// account has no profile.
    async fn resolve_role(&self, account_id: AccountId) -> Result<Role, DomainError> {
        Ok(self
            .get_profile(account_id)
            .await?
            .map(|profile| profile.role())
            .unwrap_or(Role::Unknown))
    }

    /// Count accounts (bootstrap creates the initial staff account at zero)
    async fn count_accounts(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock identity store for testing
    #[derive(Debug, Default)]
    pub struct MockIdentityStore {
        accounts: Arc<RwLock<HashMap<AccountId, UserAccount>>>,
        profiles: Arc<RwLock<HashMap<AccountId, Profile>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockIdentityStore {
        /// Create a new mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        /// Flip a stored account to inactive in place
        pub async fn deactivate(&self, id: AccountId) {
            use crate::domain::account::AccountStatus;

            let mut accounts = self.accounts.write().await;
            if let Some(account) = accounts.get_mut(&id) {
                account.set_status(AccountStatus::Inactive);
            }
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock store configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl IdentityStore for MockIdentityStore {
        async fn create_account(&self, account: UserAccount) -> Result<UserAccount, DomainError> {
            self.check_should_fail().await?;
            let mut accounts = self.accounts.write().await;

            if accounts.values().any(|a| a.email() == account.email()) {
                return Err(DomainError::duplicate(
                    "email",
                    "email is already registered",
                ));
            }

            accounts.insert(account.id(), account.clone());
            Ok(account)
        }

        async fn register(
            &self,
            account: UserAccount,
            profile: Profile,
        ) -> Result<UserAccount, DomainError> {
            self.check_should_fail().await?;
            let mut accounts = self.accounts.write().await;
            let mut profiles = self.profiles.write().await;

            if accounts.values().any(|a| a.email() == account.email()) {
                return Err(DomainError::duplicate(
                    "email",
                    "email is already registered",
                ));
            }

            accounts.insert(account.id(), account.clone());
            profiles.insert(account.id(), profile);
            Ok(account)
        }

        async fn get_account(&self, id: AccountId) -> Result<Option<UserAccount>, DomainError> {
            self.check_should_fail().await?;
            let accounts = self.accounts.read().await;
            Ok(accounts.get(&id).cloned())
        }

        async fn get_account_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserAccount>, DomainError> {
            self.check_should_fail().await?;
            let accounts = self.accounts.read().await;
            Ok(accounts.values().find(|a| a.email() == email).cloned())
        }

        async fn phone_exists(&self, phone: &str) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            let accounts = self.accounts.read().await;
            Ok(accounts.values().any(|a| a.phone() == phone))
        }

        async fn get_profile(
            &self,
            account_id: AccountId,
        ) -> Result<Option<Profile>, DomainError> {
            self.check_should_fail().await?;
            let profiles = self.profiles.read().await;
            Ok(profiles.get(&account_id).cloned())
        }

        async fn count_accounts(&self) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            let accounts = self.accounts.read().await;
            Ok(accounts.len())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::profile::{PersonKind, PersonProfile};

        fn test_account(email: &str, phone: &str) -> UserAccount {
            UserAccount::new(email, phone, "hashed_password")
        }

        fn test_profile(kind: PersonKind, user_id: AccountId) -> Profile {
            Profile::person(
                kind,
                PersonProfile::new(
                    user_id,
                    "Ana",
                    "Torres",
                    "Lopez",
                    "HEGG560427MVZRRL04",
                    "Xalapa",
                    "Veracruz",
                ),
            )
        }

        #[tokio::test]
        async fn test_register_and_resolve() {
            let store = MockIdentityStore::new();
            let account = test_account("ana@example.com", "5512345678");
            let profile = test_profile(PersonKind::Donor, account.id());

            store.register(account.clone(), profile).await.unwrap();

            let role = store.resolve_role(account.id()).await.unwrap();
            assert_eq!(role, Role::Donor);
        }

        #[tokio::test]
        async fn test_resolve_role_unknown_without_profile() {
            let store = MockIdentityStore::new();
            let account = test_account("staff@example.com", "5512345678");

            store.create_account(account.clone()).await.unwrap();

            let role = store.resolve_role(account.id()).await.unwrap();
            assert_eq!(role, Role::Unknown);
        }

        #[tokio::test]
        async fn test_email_exists_default_method() {
            let store = MockIdentityStore::new();
            let account = test_account("ana@example.com", "5512345678");

            store.create_account(account).await.unwrap();

            assert!(store.email_exists("ana@example.com").await.unwrap());
            assert!(!store.email_exists("luis@example.com").await.unwrap());
        }

        #[tokio::test]
        async fn test_duplicate_email_rejected() {
            let store = MockIdentityStore::new();
            let first = test_account("ana@example.com", "5512345678");
            let second = test_account("ana@example.com", "5587654321");

            store.create_account(first).await.unwrap();

            let result = store
                .register(second, test_profile(PersonKind::Donee, AccountId::new()))
                .await;
            assert!(matches!(result, Err(DomainError::Duplicate { .. })));
        }

        #[tokio::test]
        async fn test_should_fail_flag() {
            let store = MockIdentityStore::new();
            store.set_should_fail(true).await;

            let result = store.count_accounts().await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }
    }
}
