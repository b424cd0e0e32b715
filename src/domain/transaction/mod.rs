//! Transaction domain

mod entity;

pub use entity::{Transaction, TransactionId, TransactionRecord, TransactionStatus};
