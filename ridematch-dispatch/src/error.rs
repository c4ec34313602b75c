//! Error types for ridematch-dispatch
//!
//! One enum covers storage, configuration and matching failures; the HTTP
//! layer renders it through `IntoResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main error type for ridematch-dispatch
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file or CLI validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Errors surfaced by ridematch-common
    #[error(transparent)]
    Common(#[from] ridematch_common::Error),

    /// A chunk failed to persist; `committed` matches from earlier chunks stand
    #[error("Chunk {chunk} failed after {committed} committed matches: {source}")]
    ChunkCommit {
        chunk: usize,
        committed: usize,
        #[source]
        source: Box<Error>,
    },

    /// Reservation bookkeeping errors
    #[error("Reservation error: {0}")]
    Reservation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using ridematch-dispatch Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Error::Database(_) | Error::Common(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            Error::ChunkCommit { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "PARTIAL_COMMIT"),
            Error::Reservation(_) => (StatusCode::CONFLICT, "RESERVATION_CONFLICT"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
