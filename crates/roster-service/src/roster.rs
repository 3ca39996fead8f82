//! [`Roster`]: the session and query façade consumed by the HTTP layer.
//!
//! Validates input, delegates to the store and the [`EnrollmentService`], and
//! retries each storage failure once before surfacing it.

use std::sync::Arc;

use roster_core::{
  Error, Result,
  credentials::CredentialVerifier,
  record::{Enrollment, Grade, ResolvedGrade, ScheduledClass},
  store::{RosterStore, StoreError, StoreErrorKind},
  subject::{NewSubject, Subject},
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{
  enrollment::EnrollmentService,
  retry::{service_call, storage, store_call},
};

// ─── Input ───────────────────────────────────────────────────────────────────

/// Fields submitted at registration.
#[derive(Debug, Clone)]
pub struct Registration {
  pub name:     String,
  pub surname:  String,
  pub email:    String,
  pub password: String,
}

impl Registration {
  fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("name", &self.name),
      ("surname", &self.surname),
      ("email", &self.email),
      ("password", &self.password),
    ] {
      if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} must not be empty")));
      }
    }
    if !self.email.contains('@') {
      return Err(Error::Validation(format!(
        "{:?} is not an email address",
        self.email
      )));
    }
    Ok(())
  }
}

fn validate_grade(value: f64) -> Result<()> {
  if !value.is_finite() || value < 0.0 {
    return Err(Error::Validation(format!(
      "grade must be a non-negative number, got {value}"
    )));
  }
  Ok(())
}

fn validate_subject(input: &NewSubject) -> Result<()> {
  if input.name.trim().is_empty() {
    return Err(Error::Validation("subject name must not be empty".into()));
  }
  if input.max_capacity == 0 {
    return Err(Error::Validation("max capacity must be at least 1".into()));
  }
  Ok(())
}

// ─── Façade ──────────────────────────────────────────────────────────────────

/// The application's entry point: one per process, constructed at startup
/// around an opened store.
pub struct Roster<S, C> {
  store:       Arc<S>,
  credentials: C,
  enrollment:  EnrollmentService<S>,
}

impl<S, C> Roster<S, C>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  pub fn new(store: Arc<S>, credentials: C) -> Self {
    let enrollment = EnrollmentService::new(Arc::clone(&store));
    Self { store, credentials, enrollment }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Session ─────────────────────────────────────────────────────────────

  /// Create an account. The password is stored only as the credential
  /// verifier's hash.
  pub async fn register(&self, input: Registration) -> Result<User> {
    input.validate()?;

    let password_hash = self
      .credentials
      .hash(&input.password)
      .map_err(|e| Error::Validation(format!("password rejected: {e}")))?;
    let email = input.email.clone();
    let new_user = NewUser {
      name: input.name,
      surname: input.surname,
      email: input.email,
      password_hash,
    };

    let store = self.store.as_ref();
    let user = store_call("create_user", move || store.create_user(new_user.clone()))
      .await
      .map_err(|e| match e.kind() {
        StoreErrorKind::DuplicateEmail => Error::DuplicateEmail(email),
        _ => storage(e),
      })?;

    tracing::info!(user_id = %user.user_id, "registered user");
    Ok(user)
  }

  /// Succeeds iff a user with exactly this email exists and the password
  /// matches.
  pub async fn login(&self, email: String, password: String) -> Result<User> {
    let store = self.store.as_ref();
    let credentials = &self.credentials;
    let user = store_call("find_user_by_credentials", move || {
      store.find_user_by_credentials(email.clone(), password.clone(), credentials)
    })
    .await
    .map_err(storage)?;

    match user {
      Some(user) => {
        tracing::debug!(user_id = %user.user_id, "login succeeded");
        Ok(user)
      }
      None => Err(Error::InvalidCredentials),
    }
  }

  // ── Subjects ────────────────────────────────────────────────────────────

  pub async fn subjects(&self) -> Result<Vec<Subject>> {
    let store = self.store.as_ref();
    store_call("list_subjects", move || store.list_subjects())
      .await
      .map_err(storage)
  }

  /// Insert a subject. A scheduled subject gets its calendar entry in the
  /// same store write.
  pub async fn create_subject(&self, input: NewSubject) -> Result<Subject> {
    validate_subject(&input)?;

    let store = self.store.as_ref();
    let subject = store_call("create_subject", move || store.create_subject(input.clone()))
      .await
      .map_err(storage)?;

    tracing::info!(
      subject_id = %subject.subject_id,
      name = %subject.name,
      capacity = subject.max_capacity,
      "created subject"
    );
    Ok(subject)
  }

  // ── Enrollment ──────────────────────────────────────────────────────────

  /// See [`EnrollmentService::enroll`].
  pub async fn enroll(&self, user_id: Uuid, subject_id: Uuid) -> Result<Enrollment> {
    let enrollment = &self.enrollment;
    service_call("enroll", move || enrollment.enroll(user_id, subject_id)).await
  }

  pub async fn subjects_for_user(&self, user_id: Uuid) -> Result<Vec<Subject>> {
    self.require_user(user_id).await?;
    let store = self.store.as_ref();
    store_call("subjects_for_user", move || store.subjects_for_user(user_id))
      .await
      .map_err(storage)
  }

  // ── Grades ──────────────────────────────────────────────────────────────

  /// Record a grade for a subject the user is enrolled in.
  pub async fn record_grade(
    &self,
    user_id: Uuid,
    subject_id: Uuid,
    value: f64,
  ) -> Result<Grade> {
    validate_grade(value)?;
    self.require_user(user_id).await?;
    self.require_subject(subject_id).await?;

    let store = self.store.as_ref();
    let enrolled = store_call("is_enrolled", move || store.is_enrolled(user_id, subject_id))
      .await
      .map_err(storage)?;
    if !enrolled {
      return Err(Error::Validation(format!(
        "user {user_id} is not enrolled in subject {subject_id}"
      )));
    }

    store_call("record_grade", move || store.record_grade(user_id, subject_id, value))
      .await
      .map_err(storage)
  }

  pub async fn grades_for_user(&self, user_id: Uuid) -> Result<Vec<ResolvedGrade>> {
    self.require_user(user_id).await?;
    let store = self.store.as_ref();
    store_call("grades_for_user", move || store.grades_for_user(user_id))
      .await
      .map_err(storage)
  }

  // ── Calendar ────────────────────────────────────────────────────────────

  pub async fn calendar_for_user(&self, user_id: Uuid) -> Result<Vec<ScheduledClass>> {
    self.require_user(user_id).await?;
    let store = self.store.as_ref();
    store_call("calendar_for_user", move || store.calendar_for_user(user_id))
      .await
      .map_err(storage)
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  async fn require_user(&self, user_id: Uuid) -> Result<User> {
    let store = self.store.as_ref();
    store_call("get_user", move || store.get_user(user_id))
      .await
      .map_err(storage)?
      .ok_or(Error::UserNotFound(user_id))
  }

  async fn require_subject(&self, subject_id: Uuid) -> Result<Subject> {
    let store = self.store.as_ref();
    store_call("get_subject", move || store.get_subject(subject_id))
      .await
      .map_err(storage)?
      .ok_or(Error::SubjectNotFound(subject_id))
  }
}
