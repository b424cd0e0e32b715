//! Account domain
//!
//! The user account carries credentials and flags only. What kind of actor
//! an account is (donee, donor, institution) lives in the profile tables.

mod entity;

pub use entity::{AccountId, AccountRecord, AccountStatus, UserAccount};
