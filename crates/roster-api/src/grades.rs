//! Handlers for `/grades` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/grades` | Body: [`RecordBody`]; returns 201 + grade |
//! | `GET`  | `/users/{id}/grades` | `[{subjectName, value}]` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  credentials::CredentialVerifier, record::ResolvedGrade, store::RosterStore,
};
use roster_service::Roster;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, PathParam},
};

// ─── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBody {
  pub user_id:    Uuid,
  pub subject_id: Uuid,
  pub value:      f64,
}

/// `POST /grades`
pub async fn record<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
  JsonBody(body): JsonBody<RecordBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  let grade = roster
    .record_grade(body.user_id, body.subject_id, body.value)
    .await?;
  Ok((StatusCode::CREATED, Json(grade)))
}

// ─── Per user ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeLine {
  pub subject_name: String,
  pub value:        f64,
}

impl From<ResolvedGrade> for GradeLine {
  fn from(g: ResolvedGrade) -> Self {
    Self { subject_name: g.subject_name, value: g.grade.value }
  }
}

/// `GET /users/{id}/grades`
pub async fn for_user<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
  PathParam(user_id): PathParam<Uuid>,
) -> Result<Json<Vec<GradeLine>>, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  let grades = roster.grades_for_user(user_id).await?;
  Ok(Json(grades.into_iter().map(GradeLine::from).collect()))
}
