//! Identity infrastructure module
//!
//! Store implementations for accounts and profiles, including the
//! transactional PostgreSQL store and an in-memory store for tests
//! and local development.

mod memory;
mod postgres;

pub use memory::InMemoryIdentityStore;
pub use postgres::PostgresIdentityStore;
