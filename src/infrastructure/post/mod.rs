//! Post infrastructure module
//!
//! Services and store implementations for donation posts, feeds and
//! transactions.

mod feed;
mod memory;
mod postgres;
mod service;
mod transactions;

pub use feed::{Feed, FeedService};
pub use memory::InMemoryPostStore;
pub use postgres::PostgresPostStore;
pub use service::PostService;
pub use transactions::{TransactionOverview, TransactionService};
