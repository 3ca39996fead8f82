//! Per-subject critical sections.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type LockMap = HashMap<Uuid, Arc<AsyncMutex<()>>>;

/// One async mutex per subject id, created on first use and dropped again
/// once nobody holds or awaits it.
///
/// Holders of the guard for a subject are the only writers of enrollments
/// for that subject. Guards for different subjects never contend.
#[derive(Default)]
pub(crate) struct SubjectLocks {
  locks: Mutex<LockMap>,
}

impl SubjectLocks {
  /// Wait for exclusive access to `subject_id`. Waiters are served in FIFO
  /// order.
  pub(crate) async fn acquire(&self, subject_id: Uuid) -> SubjectGuard<'_> {
    let lock = Arc::clone(self.map().entry(subject_id).or_default());
    let mut pending = SubjectGuard { locks: self, guard: None };
    pending.guard = Some(lock.lock_owned().await);
    pending
  }

  fn map(&self) -> MutexGuard<'_, LockMap> {
    self.locks.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Drop every entry the map holds the only reference to. Guards and
  /// queued waiters each keep a clone, so their entries stay.
  fn prune(&self) {
    self.map().retain(|_, lock| Arc::strong_count(lock) > 1);
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize { self.map().len() }
}

/// Exclusive access to one subject. Releasing it, or abandoning the wait for
/// it, prunes entries nobody holds or awaits.
pub(crate) struct SubjectGuard<'a> {
  locks: &'a SubjectLocks,
  guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SubjectGuard<'_> {
  fn drop(&mut self) {
    // Release the mutex first so its reference no longer counts.
    drop(self.guard.take());
    self.locks.prune();
  }
}
