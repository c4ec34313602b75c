//! HTTP API handlers for ridematch-dispatch

pub mod health;
pub mod matching;
pub mod reservations;
pub mod sse;

pub use health::health_routes;
pub use matching::trigger_matching;
pub use reservations::{list_reservations, release_reservation};
pub use sse::{chair_notifications, user_notifications};
