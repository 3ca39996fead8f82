//! Single-retry wrappers and store-error mapping.

use std::future::Future;

use roster_core::{
  Error,
  store::{StoreError, StoreErrorKind},
};

/// Wrap a store error whose kind carries no domain meaning at the call site.
pub(crate) fn storage<E: StoreError>(err: E) -> Error {
  Error::Storage(Box::new(err))
}

/// Run a store call, retrying it once if it fails with
/// [`StoreErrorKind::Storage`]. Other kinds are returned untouched.
pub(crate) async fn store_call<T, E, F, Fut>(
  op: &'static str,
  mut call: F,
) -> Result<T, E>
where
  E: StoreError,
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, E>>,
{
  match call().await {
    Err(e) if e.kind() == StoreErrorKind::Storage => {
      tracing::warn!(op, error = %e, "store call failed; retrying once");
      call().await
    }
    other => other,
  }
}

/// Run a service operation, retrying it once if it fails with
/// [`Error::Storage`].
pub(crate) async fn service_call<T, F, Fut>(
  op: &'static str,
  mut call: F,
) -> roster_core::Result<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = roster_core::Result<T>>,
{
  match call().await {
    Err(e) if e.is_retryable() => {
      tracing::warn!(op, error = %e, "operation failed; retrying once");
      call().await
    }
    other => other,
  }
}
