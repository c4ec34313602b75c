//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};

use crate::events::{RideNotification, RideStatus};
use crate::geo::Coordinate;
use crate::ids::{ChairId, RideId, UserId};

/// A transport request as stored in the `rides` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: RideId,
    pub user_id: UserId,
    pub chair_id: Option<ChairId>,
    pub pickup: Coordinate,
    pub destination: Coordinate,
    pub created_at: DateTime<Utc>,
}

impl RideRequest {
    /// Build the notification payload for this ride
    pub fn notification(&self, chair_id: Option<&ChairId>, status: RideStatus) -> RideNotification {
        RideNotification {
            ride_id: self.id.clone(),
            user_id: self.user_id.clone(),
            chair_id: chair_id.cloned().or_else(|| self.chair_id.clone()),
            pickup: self.pickup,
            destination: self.destination,
            status,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for RideRequest {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            chair_id: row.try_get("chair_id")?,
            pickup: Coordinate::new(
                row.try_get("pickup_latitude")?,
                row.try_get("pickup_longitude")?,
            ),
            destination: Coordinate::new(
                row.try_get("destination_latitude")?,
                row.try_get("destination_longitude")?,
            ),
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A dispatchable chair joined with its model's speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chair {
    pub id: ChairId,
    /// `None` while the chair has never reported a position
    pub location: Option<Coordinate>,
    pub is_active: bool,
    pub speed: Option<i64>,
}

impl<'r> FromRow<'r, SqliteRow> for Chair {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let latitude: Option<i64> = row.try_get("latitude")?;
        let longitude: Option<i64> = row.try_get("longitude")?;
        let location = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        };

        Ok(Self {
            id: row.try_get("id")?,
            location,
            is_active: row.try_get("is_active")?,
            speed: row.try_get("speed")?,
        })
    }
}
