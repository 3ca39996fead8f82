//! Handler for `POST /enroll`.
//!
//! 200 with the stored enrollment, 409 `capacity_exceeded` or
//! `already_enrolled`, 404 for unknown ids.

use std::sync::Arc;

use axum::{Json, extract::State};
use roster_core::{
  credentials::CredentialVerifier, record::Enrollment, store::RosterStore,
};
use roster_service::Roster;
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, extract::JsonBody};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollBody {
  pub user_id:    Uuid,
  pub subject_id: Uuid,
}

/// `POST /enroll`
pub async fn enroll<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
  JsonBody(body): JsonBody<EnrollBody>,
) -> Result<Json<Enrollment>, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  let enrollment = roster.enroll(body.user_id, body.subject_id).await?;
  Ok(Json(enrollment))
}
