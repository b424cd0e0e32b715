//! In-memory identity store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    AccountId, DomainError, IdentityStore, InstitutionProfile, PersonProfile, Profile, UserAccount,
};

/// The four relational tables, guarded as one unit.
///
/// Holding a single lock over all of them gives `register` the same
/// all-or-nothing behavior a database transaction would: checks and both
/// inserts happen under one write guard.
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<AccountId, UserAccount>,
    donees: HashMap<AccountId, PersonProfile>,
    donors: HashMap<AccountId, PersonProfile>,
    institutions: HashMap<AccountId, InstitutionProfile>,
}

impl Tables {
    fn check_account_free(&self, account: &UserAccount) -> Result<(), DomainError> {
        if self.users.values().any(|u| u.email() == account.email()) {
            return Err(DomainError::duplicate(
                "email",
                "An account with this email already exists",
            ));
        }

        if self.users.values().any(|u| u.phone() == account.phone()) {
            return Err(DomainError::duplicate(
                "phone",
                "An account with this phone number already exists",
            ));
        }

        Ok(())
    }

    fn check_curp_free(&self, curp: &str) -> Result<(), DomainError> {
        let taken = self.donees.values().any(|p| p.curp() == curp)
            || self.donors.values().any(|p| p.curp() == curp);

        if taken {
            return Err(DomainError::duplicate(
                "curp",
                "This CURP is already registered",
            ));
        }

        Ok(())
    }

    fn check_institution_free(&self, institution: &InstitutionProfile) -> Result<(), DomainError> {
        if self.institutions.values().any(|i| i.name() == institution.name()) {
            return Err(DomainError::duplicate(
                "name",
                "An institution with this name already exists",
            ));
        }

        if self.institutions.values().any(|i| i.rfc() == institution.rfc()) {
            return Err(DomainError::duplicate(
                "rfc",
                "This RFC is already registered",
            ));
        }

        Ok(())
    }

    fn has_profile(&self, account_id: AccountId) -> bool {
        self.donors.contains_key(&account_id)
            || self.donees.contains_key(&account_id)
            || self.institutions.contains_key(&account_id)
    }
}

/// In-memory implementation of the identity store
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    tables: RwLock<Tables>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a profile without the one-profile check. Exists to simulate
    /// a violated one-profile invariant in resolver tests.
    #[cfg(test)]
    pub async fn attach_profile_unchecked(&self, profile: Profile) {
        let mut tables = self.tables.write().await;
        match profile {
            Profile::Donee(person) => {
                tables.donees.insert(person.user_id(), person);
            }
            Profile::Donor(person) => {
                tables.donors.insert(person.user_id(), person);
            }
            Profile::Institution(institution) => {
                tables.institutions.insert(institution.user_id(), institution);
            }
        }
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn create_account(&self, account: UserAccount) -> Result<UserAccount, DomainError> {
        let mut tables = self.tables.write().await;

        tables.check_account_free(&account)?;
        tables.users.insert(account.id(), account.clone());

        Ok(account)
    }

    async fn register(
        &self,
        account: UserAccount,
        profile: Profile,
    ) -> Result<UserAccount, DomainError> {
        let mut tables = self.tables.write().await;

        tables.check_account_free(&account)?;

        if tables.has_profile(profile.user_id()) {
            return Err(DomainError::duplicate(
                "user_id",
                "This account already has a profile",
            ));
        }

        match &profile {
            Profile::Donee(person) | Profile::Donor(person) => {
                tables.check_curp_free(person.curp())?;
            }
            Profile::Institution(institution) => {
                tables.check_institution_free(institution)?;
            }
        }

        // All checks passed; both rows land together.
        tables.users.insert(account.id(), account.clone());
        match profile {
            Profile::Donee(person) => {
                tables.donees.insert(person.user_id(), person);
            }
            Profile::Donor(person) => {
                tables.donors.insert(person.user_id(), person);
            }
            Profile::Institution(institution) => {
                tables.institutions.insert(institution.user_id(), institution);
            }
        }

        Ok(account)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<UserAccount>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email() == email).cloned())
    }

    async fn phone_exists(&self, phone: &str) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.phone() == phone))
    }

    async fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>, DomainError> {
        let tables = self.tables.read().await;

        // Fixed precedence: donor, then donee, then institution.
        if let Some(person) = tables.donors.get(&account_id) {
            return Ok(Some(Profile::Donor(person.clone())));
        }
        if let Some(person) = tables.donees.get(&account_id) {
            return Ok(Some(Profile::Donee(person.clone())));
        }
        if let Some(institution) = tables.institutions.get(&account_id) {
            return Ok(Some(Profile::Institution(institution.clone())));
        }

        Ok(None)
    }

    async fn count_accounts(&self) -> Result<usize, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PersonKind, Role};

    fn account(email: &str, phone: &str) -> UserAccount {
        UserAccount::new(email, phone, "hashed_password")
    }

    fn person(user_id: AccountId, curp: &str) -> PersonProfile {
        PersonProfile::new(
            user_id,
            "Ana",
            "Torres",
            "Lopez",
            curp,
            "Xalapa",
            "Veracruz",
        )
    }

    fn institution(user_id: AccountId, name: &str, rfc: &str) -> InstitutionProfile {
        InstitutionProfile::new(
            user_id,
            name,
            rfc,
            "Monterrey",
            "Nuevo Leon",
            "Av. Constitucion 400",
        )
    }

    #[tokio::test]
    async fn test_register_writes_account_and_profile_together() {
        let store = InMemoryIdentityStore::new();
        let new_account = account("ana@example.com", "5512345678");
        let profile = Profile::person(PersonKind::Donee, person(new_account.id(), "HEGG560427MVZRRL04"));

        store.register(new_account.clone(), profile).await.unwrap();

        assert!(store.get_account(new_account.id()).await.unwrap().is_some());
        assert_eq!(store.resolve_role(new_account.id()).await.unwrap(), Role::Donee);
    }

    #[tokio::test]
    async fn test_failed_registration_leaves_no_orphan_account() {
        let store = InMemoryIdentityStore::new();

        let first = account("ana@example.com", "5512345678");
        let profile = Profile::person(PersonKind::Donee, person(first.id(), "HEGG560427MVZRRL04"));
        store.register(first, profile).await.unwrap();

        // Fresh email and phone, but the CURP collides. The profile insert
        // would fail, so the account insert must not survive either.
        let second = account("luis@example.com", "5587654321");
        let colliding =
            Profile::person(PersonKind::Donor, person(second.id(), "HEGG560427MVZRRL04"));

        let error = store.register(second, colliding).await.unwrap_err();
        match error {
            DomainError::Duplicate { field, .. } => assert_eq!(field, "curp"),
            other => panic!("expected duplicate error, got {other:?}"),
        }

        assert!(store
            .get_account_by_email("luis@example.com")
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.count_accounts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_institution_name_is_rejected() {
        let store = InMemoryIdentityStore::new();

        let first = account("a@example.org", "8111111111");
        store
            .register(
                first.clone(),
                Profile::Institution(institution(first.id(), "Banco de Alimentos", "BAL010203AB1")),
            )
            .await
            .unwrap();

        let second = account("b@example.org", "8122222222");
        let error = store
            .register(
                second,
                Profile::Institution(institution(
                    AccountId::new(),
                    "Banco de Alimentos",
                    "XAL010203XY9",
                )),
            )
            .await
            .unwrap_err();

        match error {
            DomainError::Duplicate { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_one_account_cannot_hold_two_profiles() {
        let store = InMemoryIdentityStore::new();

        let holder = account("ana@example.com", "5512345678");
        store
            .register(
                holder.clone(),
                Profile::person(PersonKind::Donee, person(holder.id(), "HEGG560427MVZRRL04")),
            )
            .await
            .unwrap();

        let again = account("other@example.com", "5599999999");
        let error = store
            .register(
                again,
                Profile::person(PersonKind::Donor, person(holder.id(), "GOMC900101HDFRRL09")),
            )
            .await
            .unwrap_err();

        match error {
            DomainError::Duplicate { field, .. } => assert_eq!(field, "user_id"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolver_prefers_donor_when_invariant_is_violated() {
        let store = InMemoryIdentityStore::new();

        let holder = account("ana@example.com", "5512345678");
        store
            .register(
                holder.clone(),
                Profile::person(PersonKind::Donee, person(holder.id(), "HEGG560427MVZRRL04")),
            )
            .await
            .unwrap();

        // Force the invariant violation the register path prevents.
        store
            .attach_profile_unchecked(Profile::person(
                PersonKind::Donor,
                person(holder.id(), "GOMC900101HDFRRL09"),
            ))
            .await;

        assert_eq!(store.resolve_role(holder.id()).await.unwrap(), Role::Donor);
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact() {
        let store = InMemoryIdentityStore::new();
        let stored = account("ana@example.com", "5512345678");
        store.create_account(stored).await.unwrap();

        assert!(store
            .get_account_by_email("ana@example.com")
            .await
            .unwrap()
            .is_some());
        // Normalization happens before the store; lookups are literal.
        assert!(store
            .get_account_by_email("ANA@EXAMPLE.COM")
            .await
            .unwrap()
            .is_none());
    }
}
