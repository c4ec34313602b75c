//! Reservation inspection and release
//!
//! Release is the hook the ride lifecycle calls when a trip completes, so
//! the chair becomes eligible again.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use ridematch_common::ChairId;
use tracing::info;

use crate::error::{Error, Result};
use crate::reservation::Reservation;
use crate::AppState;

/// GET /api/internal/reservations
pub async fn list_reservations(State(state): State<AppState>) -> Json<Vec<Reservation>> {
    Json(state.engine.tracker().snapshot().await)
}

/// DELETE /api/internal/reservations/:chair_id
pub async fn release_reservation(
    State(state): State<AppState>,
    Path(chair_id): Path<ChairId>,
) -> Result<StatusCode> {
    let released = state
        .engine
        .tracker()
        .release(&chair_id)
        .await
        .ok_or_else(|| Error::NotFound(format!("no reservation for chair {}", chair_id)))?;

    info!(chair_id = %chair_id, ride_id = %released.ride_id, "Released reservation");
    Ok(StatusCode::NO_CONTENT)
}
