//! Handlers for subject listing and creation.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects` | Every subject |
//! | `POST` | `/subjects` | Body: [`CreateBody`]; returns 201 + subject |
//! | `GET`  | `/users/{id}/subjects` | Subjects the user is enrolled in |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  credentials::CredentialVerifier,
  store::RosterStore,
  subject::{DEFAULT_MAX_CAPACITY, NewSubject, Subject},
};
use roster_service::Roster;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, PathParam},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /subjects`
pub async fn list<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  Ok(Json(roster.subjects().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub name:         String,
  /// Defaults to 30.
  pub max_capacity: Option<u32>,
  #[serde(default)]
  pub day_of_week:  String,
  #[serde(default)]
  pub time:         String,
}

impl From<CreateBody> for NewSubject {
  fn from(b: CreateBody) -> Self {
    NewSubject {
      name:         b.name,
      max_capacity: b.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY),
      day_of_week:  b.day_of_week,
      time:         b.time,
    }
  }
}

/// `POST /subjects`
pub async fn create<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  let subject = roster.create_subject(NewSubject::from(body)).await?;
  Ok((StatusCode::CREATED, Json(subject)))
}

// ─── Per user ─────────────────────────────────────────────────────────────────

/// `GET /users/{id}/subjects`
pub async fn for_user<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
  PathParam(user_id): PathParam<Uuid>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  Ok(Json(roster.subjects_for_user(user_id).await?))
}
