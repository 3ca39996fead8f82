//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
};
use roster_service::{Argon2Credentials, Roster};
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let credentials = Argon2Credentials::with_params(8, 1, 1).unwrap();
  api_router(Arc::new(Roster::new(Arc::new(store), credentials)))
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(b) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(b.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn register(app: &Router, email: &str) -> Uuid {
  let (status, body) = send(
    app,
    "POST",
    "/register",
    Some(json!({
      "name": "Ada",
      "surname": "Lovelace",
      "email": email,
      "password": "p1",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body["userId"].as_str().unwrap().parse().unwrap()
}

async fn subject(app: &Router, body: Value) -> Uuid {
  let (status, body) = send(app, "POST", "/subjects", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  body["id"].as_str().unwrap().parse().unwrap()
}

async fn enroll(app: &Router, user_id: Uuid, subject_id: Uuid) -> (StatusCode, Value) {
  send(
    app,
    "POST",
    "/enroll",
    Some(json!({ "userId": user_id, "subjectId": subject_id })),
  )
  .await
}

// ── Session ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_login() {
  let app = app().await;
  let user_id = register(&app, "a@x.com").await;

  let (status, body) = send(
    &app,
    "POST",
    "/login",
    Some(json!({ "email": "a@x.com", "password": "p1" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["userId"], json!(user_id));
  assert_eq!(body["name"], "Ada");
  assert_eq!(body["surname"], "Lovelace");
  assert!(body.get("password").is_none());
  assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn wrong_password_is_401() {
  let app = app().await;
  register(&app, "a@x.com").await;

  let (status, body) = send(
    &app,
    "POST",
    "/login",
    Some(json!({ "email": "a@x.com", "password": "wrong" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn duplicate_registration_is_409() {
  let app = app().await;
  register(&app, "a@x.com").await;

  let (status, body) = send(
    &app,
    "POST",
    "/register",
    Some(json!({
      "name": "Other",
      "surname": "Person",
      "email": "a@x.com",
      "password": "p2",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], "duplicate_email");
}

#[tokio::test]
async fn invalid_registration_is_400() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/register",
    Some(json!({
      "name": "",
      "surname": "Lovelace",
      "email": "a@x.com",
      "password": "p1",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "validation");
}

// ── Subjects ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_subject_defaults_to_thirty_seats() {
  let app = app().await;
  subject(&app, json!({ "name": "History" })).await;

  let (status, body) = send(&app, "GET", "/subjects", None).await;
  assert_eq!(status, StatusCode::OK);
  let list = body.as_array().unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0]["name"], "History");
  assert_eq!(list[0]["maxCapacity"], 30);
}

// ── Enrollment ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn enrollment_statuses() {
  let app = app().await;
  let ada = register(&app, "ada@x.com").await;
  let bob = register(&app, "bob@x.com").await;
  let maths = subject(&app, json!({ "name": "Mathematics", "maxCapacity": 1 })).await;

  let (status, body) = enroll(&app, ada, maths).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["userId"], json!(ada));
  assert_eq!(body["subjectId"], json!(maths));

  let (status, body) = enroll(&app, ada, maths).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], "already_enrolled");

  let (status, body) = enroll(&app, bob, maths).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], "capacity_exceeded");

  let (status, body) = enroll(&app, bob, Uuid::new_v4()).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "not_found");

  let (status, body) = send(&app, "GET", &format!("/users/{ada}/subjects"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["name"], "Mathematics");

  let (_, body) = send(&app, "GET", &format!("/users/{bob}/subjects"), None).await;
  assert_eq!(body, json!([]));
}

// ── Grades and calendar ──────────────────────────────────────────────────────

#[tokio::test]
async fn grades_and_calendar_views() {
  let app = app().await;
  let ada = register(&app, "ada@x.com").await;
  let maths = subject(
    &app,
    json!({ "name": "Subject1", "dayOfWeek": "Monday", "time": "09:00" }),
  )
  .await;

  let (status, body) = send(
    &app,
    "POST",
    "/grades",
    Some(json!({ "userId": ada, "subjectId": maths, "value": 4.5 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "validation");

  enroll(&app, ada, maths).await;

  let (status, body) = send(
    &app,
    "POST",
    "/grades",
    Some(json!({ "userId": ada, "subjectId": maths, "value": 4.5 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["value"], 4.5);

  let (status, body) = send(&app, "GET", &format!("/users/{ada}/grades"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([{ "subjectName": "Subject1", "value": 4.5 }]));

  let (status, body) = send(&app, "GET", &format!("/users/{ada}/calendar"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([{ "subjectName": "Subject1", "dayOfWeek": "Monday", "time": "09:00" }])
  );
}

#[tokio::test]
async fn unknown_user_views_are_404() {
  let app = app().await;
  let id = Uuid::new_v4();
  for view in ["subjects", "grades", "calendar"] {
    let (status, body) = send(&app, "GET", &format!("/users/{id}/{view}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{view}");
    assert_eq!(body["error"], "not_found");
  }
}

// ── Malformed requests ───────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/enroll")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{\"userId\": "))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(body["error"], "validation");
  assert!(body["message"].is_string());
}

#[tokio::test]
async fn wrongly_typed_fields_are_validation_errors() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/enroll",
    Some(json!({ "userId": "not-a-uuid", "subjectId": Uuid::new_v4() })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn non_uuid_path_is_a_validation_error() {
  let app = app().await;
  for view in ["subjects", "grades", "calendar"] {
    let (status, body) = send(&app, "GET", &format!("/users/42/{view}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{view}");
    assert_eq!(body["error"], "validation");
  }
}
