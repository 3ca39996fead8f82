//! Capacity-bounded admission of students into subjects.
//!
//! Every `enroll` for a given subject runs inside that subject's critical
//! section (see [`SubjectLocks`]), so the count-then-insert sequence is
//! linearizable per subject while different subjects proceed in parallel.
//!
//! The commit point is the enrollment insert. A caller that drops the future
//! before the insert is issued leaves nothing behind; once issued, the
//! enrollment stands and the caller has to re-query to learn the outcome.

use std::sync::Arc;

use roster_core::{
  Error, Result,
  record::Enrollment,
  store::{RosterStore, StoreError, StoreErrorKind},
};
use uuid::Uuid;

use crate::{locks::SubjectLocks, retry::storage};

/// Admits or rejects enrollment requests against subject capacity.
///
/// Holds no entity state: every call re-reads the store. It must be the only
/// writer of enrollments into its store, which is why [`crate::Roster`] owns
/// exactly one.
pub struct EnrollmentService<S> {
  store: Arc<S>,
  locks: SubjectLocks,
}

impl<S: RosterStore> EnrollmentService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, locks: SubjectLocks::default() }
  }

  /// Enroll `user_id` in `subject_id`.
  ///
  /// # Errors
  ///
  /// - [`Error::SubjectNotFound`] / [`Error::UserNotFound`] for unknown ids.
  /// - [`Error::AlreadyEnrolled`] if the pair exists; capacity is not
  ///   consumed twice.
  /// - [`Error::CapacityExceeded`] if the subject is full.
  /// - [`Error::Storage`] for backend failures.
  pub async fn enroll(&self, user_id: Uuid, subject_id: Uuid) -> Result<Enrollment> {
    let _guard = self.locks.acquire(subject_id).await;

    let subject = self
      .store
      .get_subject(subject_id)
      .await
      .map_err(storage)?
      .ok_or(Error::SubjectNotFound(subject_id))?;

    if self.store.get_user(user_id).await.map_err(storage)?.is_none() {
      return Err(Error::UserNotFound(user_id));
    }

    if self
      .store
      .is_enrolled(user_id, subject_id)
      .await
      .map_err(storage)?
    {
      return Err(Error::AlreadyEnrolled { user_id, subject_id });
    }

    let taken = self
      .store
      .count_enrollments(subject_id)
      .await
      .map_err(storage)?;

    if taken >= subject.max_capacity {
      tracing::info!(
        %user_id,
        %subject_id,
        capacity = subject.max_capacity,
        "enrollment rejected: subject full"
      );
      return Err(Error::CapacityExceeded {
        subject_id,
        capacity: subject.max_capacity,
      });
    }

    let enrollment = self
      .store
      .insert_enrollment(user_id, subject_id)
      .await
      .map_err(|e| match e.kind() {
        StoreErrorKind::Conflict => Error::AlreadyEnrolled { user_id, subject_id },
        _ => storage(e),
      })?;

    tracing::info!(
      %user_id,
      %subject_id,
      seats_taken = taken + 1,
      capacity = subject.max_capacity,
      "enrollment admitted"
    );
    Ok(enrollment)
  }

  #[cfg(test)]
  pub(crate) fn locks(&self) -> &SubjectLocks { &self.locks }
}
