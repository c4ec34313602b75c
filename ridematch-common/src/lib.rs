//! # Ridematch Common Library
//!
//! Shared code for the ridematch dispatch services including:
//! - Database models and schema initialization
//! - Ride status and notification payload types
//! - Configuration file and data folder resolution
//! - Grid distance and timestamp utilities

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod events;
pub mod geo;
pub mod ids;
pub mod time;

pub use error::{Error, Result};
pub use geo::Coordinate;
pub use ids::{ChairId, RideId, UserId};
