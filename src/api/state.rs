//! Application state for shared services

use std::sync::Arc;

use crate::domain::IdentityStore;
use crate::infrastructure::auth::AuthService;
use crate::infrastructure::post::{FeedService, PostService, TransactionService};
use crate::infrastructure::registration::RegistrationService;

/// Application state containing shared services
///
/// Services hold trait-object store handles internally, so one state
/// works for both the in-memory and PostgreSQL backends. The raw
/// identity store is kept for readiness probes.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub registration_service: Arc<RegistrationService>,
    pub post_service: Arc<PostService>,
    pub feed_service: Arc<FeedService>,
    pub transaction_service: Arc<TransactionService>,
    pub identity_store: Arc<dyn IdentityStore>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        registration_service: Arc<RegistrationService>,
        post_service: Arc<PostService>,
        feed_service: Arc<FeedService>,
        transaction_service: Arc<TransactionService>,
        identity_store: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            auth_service,
            registration_service,
            post_service,
            feed_service,
            transaction_service,
            identity_store,
        }
    }
}
