//! Matching trigger
//!
//! An external scheduler calls this endpoint periodically. Each call runs
//! one full pass; calls may overlap.

use axum::{extract::State, http::StatusCode};
use tracing::error;

use crate::error::Result;
use crate::AppState;

/// GET /api/internal/matching
///
/// 204 when the pass finished, whether or not it matched anything. Storage
/// failures surface as a JSON error; matches from chunks committed before
/// the failure stand.
pub async fn trigger_matching(State(state): State<AppState>) -> Result<StatusCode> {
    match state.engine.run_pass().await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Matching pass failed: {}", e);
            Err(e)
        }
    }
}
