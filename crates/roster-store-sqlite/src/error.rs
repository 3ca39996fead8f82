//! Error type for `roster-store-sqlite`.

use roster_core::store::{StoreError, StoreErrorKind};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("column out of range: {0}")]
  OutOfRange(String),

  #[error("user {user_id} is already enrolled in subject {subject_id}")]
  Conflict { user_id: Uuid, subject_id: Uuid },

  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  /// A foreign key rejected the write.
  #[error("dangling reference: {0}")]
  Dangling(String),
}

impl StoreError for Error {
  fn kind(&self) -> StoreErrorKind {
    match self {
      Self::Conflict { .. } => StoreErrorKind::Conflict,
      Self::DuplicateEmail(_) => StoreErrorKind::DuplicateEmail,
      Self::Dangling(_) => StoreErrorKind::Dangling,
      Self::Database(_) | Self::Uuid(_) | Self::DateParse(_) | Self::OutOfRange(_) => {
        StoreErrorKind::Storage
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
