//! Authentication infrastructure module
//!
//! Password hashing with Argon2, JWT token issuing and validation,
//! and the login service built on top of them.

mod jwt;
mod password;
mod service;

pub use jwt::{JwtTokenService, TokenClaims, TokenConfig, TokenIssuer, TokenPair, TokenUse};
pub use password::{Argon2Hasher, PasswordHasher};
pub use service::{AuthService, IdentityOverview, SessionGrant};
