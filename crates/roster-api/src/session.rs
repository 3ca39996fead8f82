//! Handlers for registration and login.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | 201 `{"userId"}`; 409 on a taken email |
//! | `POST` | `/login` | 200 user profile; 401 on mismatch |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use roster_core::{credentials::CredentialVerifier, store::RosterStore, user::User};
use roster_service::{Roster, roster::Registration};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ApiError, extract::JsonBody};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     String,
  pub surname:  String,
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
  pub user_id: Uuid,
}

/// `POST /register`
pub async fn register<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
  JsonBody(body): JsonBody<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  let user = roster
    .register(Registration {
      name:     body.name,
      surname:  body.surname,
      email:    body.email,
      password: body.password,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(Registered { user_id: user.user_id })))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// The profile returned on login. Never carries credentials.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub user_id: Uuid,
  pub name:    String,
  pub surname: String,
  pub email:   String,
}

impl From<User> for Profile {
  fn from(u: User) -> Self {
    Self {
      user_id: u.user_id,
      name:    u.name,
      surname: u.surname,
      email:   u.email,
    }
  }
}

/// `POST /login`
pub async fn login<S, C>(
  State(roster): State<Arc<Roster<S, C>>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  let user = roster.login(body.email, body.password).await?;
  Ok(Json(Profile::from(user)))
}
