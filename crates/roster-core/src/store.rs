//! The `RosterStore` trait and the classification of its failures.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-service`, `roster-api`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  credentials::CredentialVerifier,
  record::{Enrollment, Grade, ResolvedGrade, ScheduledClass},
  subject::{CalendarEntry, NewSubject, Subject},
  user::{NewUser, StoredUser, User},
};

// ─── Error classification ────────────────────────────────────────────────────

/// What went wrong in a store call, as far as callers need to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  /// The `(user_id, subject_id)` enrollment key already exists.
  Conflict,
  /// Another user is registered with the same email.
  DuplicateEmail,
  /// A referenced user or subject does not exist.
  Dangling,
  /// I/O, transaction or decoding failure. May succeed on retry.
  Storage,
}

/// Implemented by backend error types so the service layer can map them onto
/// [`crate::Error`] without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> StoreErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roster store backend.
///
/// Users, subjects and calendar entries are immutable once written. Grades
/// and enrollments are append-only.
///
/// The store performs no admission control of its own: callers that insert
/// enrollments are responsible for serialising the count-then-insert sequence
/// per subject (see `roster-service`).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails with [`StoreErrorKind::DuplicateEmail`] if the
  /// email is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look a user up by exact email, returning the stored credential string.
  fn find_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<StoredUser>, Self::Error>> + Send + '_;

  /// Return the user whose email matches exactly and whose stored credential
  /// accepts `password`.
  fn find_user_by_credentials<'a, C>(
    &'a self,
    email: String,
    password: String,
    verifier: &'a C,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a
  where
    C: CredentialVerifier,
  {
    async move {
      let Some(stored) = self.find_user_by_email(email).await? else {
        return Ok(None);
      };
      Ok(
        verifier
          .verify(&password, &stored.password_hash)
          .then_some(stored.user),
      )
    }
  }

  // ── Subjects ──────────────────────────────────────────────────────────

  /// Persist a subject. A scheduled subject gets its calendar entry in the
  /// same write: either both rows exist afterwards or neither does.
  fn create_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  fn get_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// All subjects, in no particular order.
  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  // ── Enrollments ───────────────────────────────────────────────────────

  fn count_enrollments(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + '_;

  fn is_enrolled(
    &self,
    user_id: Uuid,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Insert the pair. Fails with [`StoreErrorKind::Conflict`] if it already
  /// exists and [`StoreErrorKind::Dangling`] if either side is missing.
  fn insert_enrollment(
    &self,
    user_id: Uuid,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Enrollment, Self::Error>> + Send + '_;

  /// Subjects the user is enrolled in.
  fn subjects_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  // ── Grades ────────────────────────────────────────────────────────────

  fn record_grade(
    &self,
    user_id: Uuid,
    subject_id: Uuid,
    value: f64,
  ) -> impl Future<Output = Result<Grade, Self::Error>> + Send + '_;

  /// Every grade recorded for the user, with subject names resolved.
  fn grades_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ResolvedGrade>, Self::Error>> + Send + '_;

  // ── Calendar ──────────────────────────────────────────────────────────

  fn add_calendar_entry(
    &self,
    subject_id: Uuid,
    day_of_week: String,
    time: String,
  ) -> impl Future<Output = Result<CalendarEntry, Self::Error>> + Send + '_;

  /// Calendar entries of every subject the user is enrolled in.
  fn calendar_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ScheduledClass>, Self::Error>> + Send + '_;
}
