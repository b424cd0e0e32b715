use std::sync::Arc;

use crate::domain::{
    DomainError, IdentityStore, InstitutionProfile, InstitutionRegistrationForm, PersonProfile,
    PersonRegistrationForm, Profile, UserAccount,
};
use crate::infrastructure::auth::PasswordHasher;

/// Orchestrates account sign-up. Every registration creates one account and
/// exactly one profile in a single atomic store operation, so a failure at
/// any step leaves nothing behind.
pub struct RegistrationService {
    identity: Arc<dyn IdentityStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegistrationService {
    pub fn new(identity: Arc<dyn IdentityStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { identity, hasher }
    }

    /// Registers a person account as either a donee or a donor, selected by
    /// the form's `user_type` discriminator.
    pub async fn register_person(
        &self,
        form: PersonRegistrationForm,
    ) -> Result<UserAccount, DomainError> {
        let valid = form.validate()?;

        self.check_contact_free(&valid.email, &valid.phone).await?;

        let password_hash = self.hasher.hash(&valid.password)?;
        let account = UserAccount::new(valid.email, valid.phone, password_hash);

        let mut person = PersonProfile::new(
            account.id(),
            valid.first_name,
            valid.first_surname,
            valid.second_surname,
            valid.curp,
            valid.city,
            valid.state,
        );
        if let Some(middle_name) = valid.middle_name {
            person = person.with_middle_name(middle_name);
        }

        self.identity
            .register(account, Profile::person(valid.kind, person))
            .await
    }

    /// Registers an institution account with its institution profile.
    pub async fn register_institution(
        &self,
        form: InstitutionRegistrationForm,
    ) -> Result<UserAccount, DomainError> {
        let valid = form.validate()?;

        self.check_contact_free(&valid.email, &valid.phone).await?;

        let password_hash = self.hasher.hash(&valid.password)?;
        let account = UserAccount::new(valid.email, valid.phone, password_hash);

        let institution = InstitutionProfile::new(
            account.id(),
            valid.name,
            valid.rfc,
            valid.city,
            valid.state,
            valid.address,
        );

        self.identity
            .register(account, Profile::Institution(institution))
            .await
    }

    /// Rejects sign-up early when the email or phone is already taken. The
    /// store re-checks both under its own uniqueness guarantees, so this is
    /// a fast path, not the enforcement point.
    async fn check_contact_free(&self, email: &str, phone: &str) -> Result<(), DomainError> {
        if self.identity.email_exists(&email.to_lowercase()).await? {
            return Err(DomainError::duplicate(
                "email",
                "An account with this email already exists",
            ));
        }

        if self.identity.phone_exists(phone).await? {
            return Err(DomainError::duplicate(
                "phone",
                "An account with this phone number already exists",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockIdentityStore, Role};
    use crate::infrastructure::auth::Argon2Hasher;

    fn service() -> (RegistrationService, Arc<MockIdentityStore>) {
        let identity = Arc::new(MockIdentityStore::new());
        let service = RegistrationService::new(identity.clone(), Arc::new(Argon2Hasher::new()));
        (service, identity)
    }

    fn person_form(email: &str, phone: &str, curp: &str, user_type: &str) -> PersonRegistrationForm {
        PersonRegistrationForm {
            first_name: "Maria".to_string(),
            middle_name: None,
            first_surname: "Hernandez".to_string(),
            second_surname: "Garcia".to_string(),
            curp: curp.to_string(),
            city: "Xalapa".to_string(),
            state: "Veracruz".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: "Str0ngPassword".to_string(),
            password_confirm: "Str0ngPassword".to_string(),
            user_type: user_type.to_string(),
        }
    }

    fn institution_form(email: &str, phone: &str) -> InstitutionRegistrationForm {
        InstitutionRegistrationForm {
            name: "Banco de Alimentos".to_string(),
            rfc: "BAL010203AB1".to_string(),
            city: "Monterrey".to_string(),
            state: "Nuevo Leon".to_string(),
            address: "Av. Constitucion 400".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: "Str0ngPassword".to_string(),
            password_confirm: "Str0ngPassword".to_string(),
        }
    }

    #[tokio::test]
    async fn test_registers_donee_with_profile() {
        let (service, identity) = service();

        let account = service
            .register_person(person_form(
                "Maria@Example.com",
                "5512345678",
                "hegg560427mvzrrl04",
                "donee",
            ))
            .await
            .unwrap();

        assert_eq!(account.email(), "maria@example.com");
        assert_eq!(identity.resolve_role(account.id()).await.unwrap(), Role::Donee);

        let profile = identity.get_profile(account.id()).await.unwrap().unwrap();
        match profile {
            Profile::Donee(person) => assert_eq!(person.curp(), "HEGG560427MVZRRL04"),
            other => panic!("expected donee profile, got {:?}", other.role()),
        }
    }

    #[tokio::test]
    async fn test_registers_donor_when_user_type_says_so() {
        let (service, identity) = service();

        let account = service
            .register_person(person_form(
                "donor@example.com",
                "5587654321",
                "GOMC900101HDFRRL09",
                "donor",
            ))
            .await
            .unwrap();

        assert_eq!(identity.resolve_role(account.id()).await.unwrap(), Role::Donor);
    }

    #[tokio::test]
    async fn test_registers_institution_with_uppercased_rfc() {
        let (service, identity) = service();

        let mut form = institution_form("contact@bancodealimentos.org", "8112345678");
        form.rfc = "bal010203ab1".to_string();

        let account = service.register_institution(form).await.unwrap();

        let profile = identity.get_profile(account.id()).await.unwrap().unwrap();
        match profile {
            Profile::Institution(institution) => assert_eq!(institution.rfc(), "BAL010203AB1"),
            other => panic!("expected institution profile, got {:?}", other.role()),
        }
    }

    #[tokio::test]
    async fn test_rejects_invalid_form_before_touching_the_store() {
        let (service, identity) = service();
        identity.set_should_fail(true).await;

        let mut form = person_form("maria@example.com", "5512345678", "HEGG560427MVZRRL04", "donee");
        form.password_confirm = "different".to_string();

        let error = service.register_person(form).await.unwrap_err();
        match error {
            DomainError::Validation { fields, .. } => {
                assert!(fields.contains_key("password_confirm"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejects_duplicate_email_case_insensitively() {
        let (service, _) = service();

        service
            .register_person(person_form(
                "maria@example.com",
                "5512345678",
                "HEGG560427MVZRRL04",
                "donee",
            ))
            .await
            .unwrap();

        let error = service
            .register_person(person_form(
                "MARIA@EXAMPLE.COM",
                "5599999999",
                "GOMC900101HDFRRL09",
                "donor",
            ))
            .await
            .unwrap_err();

        match error {
            DomainError::Duplicate { field, .. } => assert_eq!(field, "email"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejects_duplicate_phone() {
        let (service, _) = service();

        service
            .register_institution(institution_form("first@example.org", "8112345678"))
            .await
            .unwrap();

        let error = service
            .register_institution(institution_form("second@example.org", "8112345678"))
            .await
            .unwrap_err();

        match error {
            DomainError::Duplicate { field, .. } => assert_eq!(field, "phone"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_surfaces_store_failures() {
        let (service, identity) = service();
        identity.set_should_fail(true).await;

        let result = service
            .register_person(person_form(
                "maria@example.com",
                "5512345678",
                "HEGG560427MVZRRL04",
                "donee",
            ))
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
