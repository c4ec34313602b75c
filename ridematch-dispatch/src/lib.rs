//! ridematch-dispatch library
//!
//! Periodic matching of waiting ride requests to free chairs, exposed over
//! HTTP: an internal trigger endpoint runs one pass, and chairs and users
//! follow their ride status over SSE.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod matching;
pub mod notify;
pub mod reservation;

pub use error::{Error, Result};

use matching::MatchingEngine;
use notify::SseNotifier;

/// Buffered notifications per broadcast channel before slow clients lag
pub const NOTIFICATION_CAPACITY: usize = 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub notifier: SseNotifier,
}

impl AppState {
    pub fn new(engine: Arc<MatchingEngine>, notifier: SseNotifier) -> Self {
        Self { engine, notifier }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get};

    let internal = Router::new()
        .route("/api/internal/matching", get(api::trigger_matching))
        .route("/api/internal/reservations", get(api::list_reservations))
        .route(
            "/api/internal/reservations/:chair_id",
            delete(api::release_reservation),
        );

    let notifications = Router::new()
        .route("/api/chair/:chair_id/notification", get(api::chair_notifications))
        .route("/api/app/:user_id/notification", get(api::user_notifications));

    Router::new()
        .merge(internal)
        .merge(notifications)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
