//! Authenticated v1 API endpoints

pub mod categories;
pub mod feed;
pub mod posts;
pub mod transactions;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/feed", get(feed::get_feed))
        .route("/posts", post(posts::create_post))
        .route("/posts/{post_id}", get(posts::get_post))
        .route("/posts/{post_id}/cancel", post(posts::cancel_post))
        .route(
            "/posts/{post_id}/transactions",
            post(posts::create_transaction),
        )
        .route("/transactions", get(transactions::list_transactions))
        .route(
            "/transactions/{transaction_id}/approve",
            post(transactions::approve_transaction),
        )
        .route(
            "/transactions/{transaction_id}/reject",
            post(transactions::reject_transaction),
        )
        .route(
            "/transactions/{transaction_id}/complete",
            post(transactions::complete_transaction),
        )
}
