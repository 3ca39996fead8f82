//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by a [`Roster`] over any
//! [`roster_core::store::RosterStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(roster_api::api_router(roster.clone()))
//! ```

pub mod calendar;
pub mod enrollment;
pub mod error;
pub mod extract;
pub mod grades;
pub mod session;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::{credentials::CredentialVerifier, store::RosterStore};
use roster_service::Roster;

pub use error::ApiError;

/// Build a fully-materialised API router for `roster`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C>(roster: Arc<Roster<S, C>>) -> Router<()>
where
  S: RosterStore + 'static,
  C: CredentialVerifier + 'static,
{
  Router::new()
    // Session
    .route("/register", post(session::register::<S, C>))
    .route("/login", post(session::login::<S, C>))
    // Subjects
    .route("/subjects", get(subjects::list::<S, C>).post(subjects::create::<S, C>))
    // Enrollment
    .route("/enroll", post(enrollment::enroll::<S, C>))
    // Grades
    .route("/grades", post(grades::record::<S, C>))
    // Per-user views
    .route("/users/{id}/subjects", get(subjects::for_user::<S, C>))
    .route("/users/{id}/grades", get(grades::for_user::<S, C>))
    .route("/users/{id}/calendar", get(calendar::for_user::<S, C>))
    .with_state(roster)
}

#[cfg(test)]
mod tests;
