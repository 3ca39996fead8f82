//! Enrollment admission control and the session/query façade.
//!
//! [`EnrollmentService`] enforces subject capacity; [`Roster`] bundles it with
//! registration, login, grades and calendar lookups behind one API. Both are
//! generic over any [`roster_core::store::RosterStore`].

pub mod credentials;
pub mod enrollment;
pub mod roster;

mod retry;
mod locks;

pub use credentials::{Argon2Credentials, CredentialError};
pub use enrollment::EnrollmentService;
pub use roster::Roster;
