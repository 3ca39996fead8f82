//! Request extractors whose rejections use the API's JSON error body.
//!
//! axum's own `Json` and `Path` reject with plain-text bodies; these wrap
//! them and report the failure as [`Error::Validation`].

use axum::{
  extract::{FromRequest, FromRequestParts, Request},
  http::request::Parts,
};
use roster_core::Error;

use crate::error::ApiError;

/// A JSON request body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
  axum::Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let axum::Json(value) = axum::Json::<T>::from_request(req, state)
      .await
      .map_err(|r| ApiError(Error::Validation(r.body_text())))?;
    Ok(Self(value))
  }
}

/// Path parameters, e.g. the `{id}` of `/users/{id}/grades`.
pub struct PathParam<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParam<T>
where
  axum::extract::Path<T>:
    FromRequestParts<S, Rejection = axum::extract::rejection::PathRejection>,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let axum::extract::Path(value) =
      axum::extract::Path::<T>::from_request_parts(parts, state)
        .await
        .map_err(|r| ApiError(Error::Validation(r.body_text())))?;
    Ok(Self(value))
  }
}
