//! Handler for `GET /users/{id}/calendar`.

use std::sync::Arc;

use axum::{Json, extract::State};
use roster_core::{
  credentials::CredentialVerifier, record::ScheduledClass, store::RosterStore,
};
use roster_service::Roster;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ApiError, extract::PathParam};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarLine {
  pub subject_name: String,
  pub day_of_week:  String,
  pub time:         String,
}

impl From<ScheduledClass> for CalendarLine {
  fn from(c: ScheduledClass) -> Self {
    Self {
      subject_name: c.subject_name,
      day_of_week:  c.entry.day_of_week,
      time:         c.entry.time,
    }
  }
}

/// `GET /users/{id}/calendar`
pub async fn for_user<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
  PathParam(user_id): PathParam<Uuid>,
) -> Result<Json<Vec<CalendarLine>>, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  let calendar = roster.calendar_for_user(user_id).await?;
  Ok(Json(calendar.into_iter().map(CalendarLine::from).collect()))
}
