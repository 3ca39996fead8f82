//! The error taxonomy shared by every layer above the store.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("subject not found: {0}")]
  SubjectNotFound(Uuid),

  /// Admission denied: the subject already holds `capacity` students.
  #[error("subject {subject_id} is full ({capacity} students)")]
  CapacityExceeded { subject_id: Uuid, capacity: u32 },

  #[error("user {user_id} is already enrolled in subject {subject_id}")]
  AlreadyEnrolled { user_id: Uuid, subject_id: Uuid },

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  #[error("validation error: {0}")]
  Validation(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Only storage failures are worth another attempt; everything else is a
  /// definite answer.
  pub fn is_retryable(&self) -> bool { matches!(self, Self::Storage(_)) }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::UserNotFound(_) | Self::SubjectNotFound(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
