//! Registered users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered student. Immutable once created.
///
/// The credential string never leaves the store inside this type; see
/// [`StoredUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  pub surname:    String,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::RosterStore::create_user`].
///
/// `password_hash` is whatever the configured
/// [`CredentialVerifier`](crate::credentials::CredentialVerifier) produced;
/// the store treats it as opaque.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub surname:       String,
  pub email:         String,
  pub password_hash: String,
}

/// A user together with the stored credential string, as read back for
/// login.
#[derive(Debug, Clone)]
pub struct StoredUser {
  pub user:          User,
  pub password_hash: String,
}
