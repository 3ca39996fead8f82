//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl ApiError {
  /// The status code and the stable `error` string sent to clients.
  pub fn classify(&self) -> (StatusCode, &'static str) {
    match &self.0 {
      Error::UserNotFound(_) | Error::SubjectNotFound(_) => {
        (StatusCode::NOT_FOUND, "not_found")
      }
      Error::CapacityExceeded { .. } => (StatusCode::CONFLICT, "capacity_exceeded"),
      Error::AlreadyEnrolled { .. } => (StatusCode::CONFLICT, "already_enrolled"),
      Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
      Error::DuplicateEmail(_) => (StatusCode::CONFLICT, "duplicate_email"),
      Error::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
      Error::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind) = self.classify();
    let message = match &self.0 {
      Error::Storage(e) => {
        tracing::error!(error = %e, "request failed in storage");
        "internal storage error".to_string()
      }
      other => other.to_string(),
    };
    (status, Json(json!({ "error": kind, "message": message }))).into_response()
  }
}
