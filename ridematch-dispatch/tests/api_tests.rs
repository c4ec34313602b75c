//! Integration tests for ridematch-dispatch API endpoints

mod helpers;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::Utc;
use helpers::*;
use http_body_util::BodyExt;
use ridematch_common::ChairId;
use ridematch_dispatch::config::MatchingConfig;
use ridematch_dispatch::db::SqliteDispatchStore;
use ridematch_dispatch::matching::MatchingEngine;
use ridematch_dispatch::notify::SseNotifier;
use ridematch_dispatch::reservation::ReservationTracker;
use ridematch_dispatch::{build_router, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: router over `pool` with an SSE notifier
fn setup_app(pool: &SqlitePool) -> (axum::Router, Arc<MatchingEngine>) {
    let notifier = SseNotifier::new(64);
    let engine = Arc::new(MatchingEngine::new(
        Arc::new(SqliteDispatchStore::new(pool.clone())),
        Arc::new(ReservationTracker::new()),
        Arc::new(notifier.clone()),
        MatchingConfig::default(),
    ));
    let app = build_router(AppState::new(Arc::clone(&engine), notifier));
    (app, engine)
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let pool = create_test_db().await;
    let (app, _) = setup_app(&pool);

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "ridematch-dispatch");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_trigger_with_nothing_to_do_returns_no_content() {
    let pool = create_test_db().await;
    let (app, _) = setup_app(&pool);

    let response = app
        .oneshot(test_request("GET", "/api/internal/matching"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_trigger_matches_and_lists_reservation() {
    let pool = create_test_db().await;
    let now = Utc::now();
    seed_user(&pool, "u1").await;
    seed_chair(&pool, "c1", (0, 0)).await;
    seed_ride(&pool, "r1", "u1", (2, 2), 1, now).await;
    let (app, _) = setup_app(&pool);

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/internal/matching"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(assigned_chair(&pool, "r1").await, Some(ChairId::from("c1")));

    let response = app
        .oneshot(test_request("GET", "/api/internal/reservations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let reservations = body.as_array().expect("array");
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0]["chair_id"], "c1");
    assert_eq!(reservations[0]["ride_id"], "r1");
    assert_eq!(reservations[0]["state"], "confirmed");
}

#[tokio::test]
async fn test_release_unknown_chair_is_not_found() {
    let pool = create_test_db().await;
    let (app, _) = setup_app(&pool);

    let response = app
        .oneshot(test_request("DELETE", "/api/internal/reservations/ghost"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_release_frees_reserved_chair() {
    let pool = create_test_db().await;
    let now = Utc::now();
    seed_user(&pool, "u1").await;
    seed_chair(&pool, "c1", (0, 0)).await;
    seed_ride(&pool, "r1", "u1", (0, 0), 1, now).await;
    let (app, engine) = setup_app(&pool);

    engine.run_pass_at(now).await.unwrap();
    assert!(engine.tracker().is_reserved(&ChairId::from("c1")).await);

    let response = app
        .oneshot(test_request("DELETE", "/api/internal/reservations/c1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!engine.tracker().is_reserved(&ChairId::from("c1")).await);
}

#[tokio::test]
async fn test_trigger_storage_failure_returns_json_error() {
    let pool = create_test_db().await;
    let (app, _) = setup_app(&pool);
    pool.close().await;

    let response = app
        .oneshot(test_request("GET", "/api/internal/matching"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_chair_notification_stream_is_event_stream() {
    let pool = create_test_db().await;
    let (app, _) = setup_app(&pool);

    let response = app
        .oneshot(test_request("GET", "/api/chair/c1/notification"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/event-stream"));
}

#[tokio::test]
async fn test_user_notification_stream_is_event_stream() {
    let pool = create_test_db().await;
    let (app, _) = setup_app(&pool);

    let response = app
        .oneshot(test_request("GET", "/api/app/u1/notification"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
