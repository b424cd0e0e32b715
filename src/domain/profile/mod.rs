//! Profile domain
//!
//! Donee and donor profiles share one shape across two tables; institutions
//! have their own. An account owns at most one profile, and the resolved
//! [`Role`] drives post policy, feed selection and the login redirect.

mod entity;

pub use entity::{
    InstitutionProfile, InstitutionProfileRecord, PersonKind, PersonProfile, PersonProfileRecord,
    Profile, ProfileId, Role,
};
