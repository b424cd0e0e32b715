//! Identity storage
//!
//! One store covers accounts and profiles so that registration can write
//! both in a single transaction.

mod store;

pub use store::IdentityStore;

#[cfg(test)]
pub use store::mock::MockIdentityStore;
