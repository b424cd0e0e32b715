//! Registration infrastructure module
//!
//! Sign-up flows for person and institution accounts.

mod service;

pub use service::RegistrationService;
