//! Startup pieces of the Roster server: configuration, subject seeding and the
//! traced router.

pub mod settings;

use std::sync::Arc;

use axum::Router;
use roster_core::{credentials::CredentialVerifier, store::RosterStore};
use roster_service::Roster;
use tower_http::trace::TraceLayer;

pub use settings::{Argon2Config, SeedSubject, ServerConfig};

/// The API router wrapped in request tracing.
pub fn app<S, C>(roster: Arc<Roster<S, C>>) -> Router
where
  S: RosterStore + 'static,
  C: CredentialVerifier + 'static,
{
  roster_api::api_router(roster).layer(TraceLayer::new_for_http())
}

/// Insert `seeds` unless the store already holds subjects. Returns how many
/// were created.
pub async fn seed_subjects<S, C>(
  roster: &Roster<S, C>,
  seeds: &[SeedSubject],
) -> roster_core::Result<usize>
where
  S: RosterStore,
  C: CredentialVerifier,
{
  if seeds.is_empty() || !roster.subjects().await?.is_empty() {
    return Ok(0);
  }
  for seed in seeds {
    roster.create_subject(seed.into()).await?;
  }
  tracing::info!(count = seeds.len(), "seeded subjects");
  Ok(seeds.len())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
  };
  use roster_service::Argon2Credentials;
  use roster_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn roster() -> Arc<Roster<SqliteStore, Argon2Credentials>> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let credentials = Argon2Credentials::with_params(8, 1, 1).unwrap();
    Arc::new(Roster::new(Arc::new(store), credentials))
  }

  fn seed(name: &str) -> SeedSubject {
    SeedSubject {
      name:         name.to_string(),
      max_capacity: 30,
      day_of_week:  "Monday".to_string(),
      time:         "09:00".to_string(),
    }
  }

  #[tokio::test]
  async fn seeds_only_an_empty_store() {
    let roster = roster().await;
    let seeds = [seed("Mathematics"), seed("History")];

    assert_eq!(seed_subjects(&roster, &seeds).await.unwrap(), 2);
    assert_eq!(seed_subjects(&roster, &seeds).await.unwrap(), 0);
    assert_eq!(roster.subjects().await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn traced_app_serves_the_api() {
    let roster = roster().await;
    seed_subjects(&roster, &[seed("Mathematics")]).await.unwrap();

    let req = Request::builder().uri("/subjects").body(Body::empty()).unwrap();
    let resp = app(roster).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body[0]["name"], "Mathematics");
    assert_eq!(body[0]["dayOfWeek"], "Monday");
  }
}
