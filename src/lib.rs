//! Donativa API
//!
//! A donation matching service connecting donees, donors and institutions:
//! - Person and institution registration with profile validation
//! - Role-aware donation posts (requests and offers)
//! - Feeds pairing each role with the posts it can act on
//! - Transactions committing quantities against posts

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{Category, IdentityStore, PostStore, UserAccount};
use infrastructure::auth::{
    Argon2Hasher, AuthService, JwtTokenService, PasswordHasher, TokenConfig,
};
use infrastructure::identity::{InMemoryIdentityStore, PostgresIdentityStore};
use infrastructure::post::{
    FeedService, InMemoryPostStore, PostService, PostgresPostStore, TransactionService,
};
use infrastructure::registration::RegistrationService;
use infrastructure::storage::{connect, run_storage_migrations, PostgresConfig, StorageKind};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    // Determine storage backend from config
    let storage_kind = StorageKind::parse(&config.storage.kind).unwrap_or(StorageKind::Memory);
    info!("Storage backend: {:?}", storage_kind);

    let (identity_store, post_store): (Arc<dyn IdentityStore>, Arc<dyn PostStore>) =
        match storage_kind {
            StorageKind::Postgres => {
                let url = config
                    .storage
                    .url
                    .clone()
                    .or_else(|| std::env::var("DATABASE_URL").ok())
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "no database URL configured (set storage.url or DATABASE_URL)"
                        )
                    })?;

                info!("Connecting to PostgreSQL...");
                let pg_config = PostgresConfig::new(url)
                    .with_max_connections(config.storage.max_connections);
                let pool = connect(&pg_config).await?;
                run_storage_migrations(&pool).await?;
                info!("PostgreSQL connection established");

                (
                    Arc::new(PostgresIdentityStore::new(pool.clone())),
                    Arc::new(PostgresPostStore::new(pool)),
                )
            }
            StorageKind::Memory => (
                Arc::new(InMemoryIdentityStore::new()),
                Arc::new(InMemoryPostStore::new()),
            ),
        };

    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
    let tokens = Arc::new(JwtTokenService::new(build_token_config(config)));

    let registration_service = Arc::new(RegistrationService::new(
        identity_store.clone(),
        hasher.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        identity_store.clone(),
        hasher.clone(),
        tokens,
    ));
    let post_service = Arc::new(PostService::new(post_store.clone(), identity_store.clone()));
    let feed_service = Arc::new(FeedService::new(post_store.clone(), identity_store.clone()));
    let transaction_service = Arc::new(TransactionService::new(post_store.clone()));

    // Create an initial staff account and reference data on first start
    create_initial_staff_account(identity_store.as_ref(), hasher.as_ref()).await?;
    seed_default_categories(post_store.as_ref()).await?;

    Ok(AppState::new(
        auth_service,
        registration_service,
        post_service,
        feed_service,
        transaction_service,
        identity_store,
    ))
}

/// Build token configuration from config, env var, or a random secret
fn build_token_config(config: &AppConfig) -> TokenConfig {
    let secret = config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            warn!(
                "No JWT secret configured. Generating random secret. \
                Sessions will NOT persist across restarts. \
                Set auth.jwt_secret or the JWT_SECRET environment variable."
            );
            generate_random_secret()
        });

    TokenConfig::new(
        secret,
        config.auth.access_token_minutes,
        config.auth.refresh_token_days * 24 * 60,
    )
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Generate a random password for the initial staff account
fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Create an initial staff account if no accounts exist
async fn create_initial_staff_account(
    identity: &dyn IdentityStore,
    hasher: &dyn PasswordHasher,
) -> anyhow::Result<()> {
    if identity.count_accounts().await? > 0 {
        return Ok(());
    }

    let email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@donativa.local".to_string());

    // Use ADMIN_PASSWORD env var if set, otherwise generate random password
    let (password, is_default) = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) if !p.is_empty() => (p, true),
        _ => (generate_random_password(), false),
    };

    let mut account = UserAccount::new(&email, "0000000000", hasher.hash(&password)?);
    account.grant_staff();
    account.grant_superuser();

    identity.create_account(account).await?;

    info!("===========================================");
    info!("Initial staff account created!");
    info!("Email: {}", email);

    if is_default {
        info!("Password: (set via ADMIN_PASSWORD)");
    } else {
        info!("Password: {}", password);
    }

    info!("Please change this password after first login.");
    info!("===========================================");

    Ok(())
}

/// Seed the default post categories when none exist
async fn seed_default_categories(posts: &dyn PostStore) -> anyhow::Result<()> {
    if posts.count_categories().await? > 0 {
        return Ok(());
    }

    for (name, description) in default_categories() {
        posts
            .create_category(Category::new(name, description))
            .await?;
    }

    info!("Seeded default post categories");

    Ok(())
}

fn default_categories() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Food", "Non-perishable food and groceries"),
        ("Clothing", "Clothes and footwear in good condition"),
        ("Medicine", "Over-the-counter medicine and medical supplies"),
        ("Furniture", "Household furniture and appliances"),
        ("School supplies", "Notebooks, backpacks and stationery"),
        ("Toys", "Toys and games for children"),
    ]
}
