//! Ride status events delivered to chairs and users
//!
//! The dispatch engine only ever emits `MATCHING`; the remaining statuses
//! belong to the ride lifecycle and share the same wire format so that one
//! notification stream can carry the whole trip.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::Coordinate;
use crate::ids::{ChairId, RideId, UserId};

/// Ride status labels as sent over notification channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    /// A chair has been assigned and the ride is waiting for it to respond
    Matching,
    /// Chair is heading to the pickup point
    Enroute,
    /// Chair has arrived at the pickup point
    Pickup,
    /// Passenger is on board
    Carrying,
    /// Chair has arrived at the destination
    Arrived,
    /// Ride has been evaluated and closed
    Completed,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Matching => "MATCHING",
            RideStatus::Enroute => "ENROUTE",
            RideStatus::Pickup => "PICKUP",
            RideStatus::Carrying => "CARRYING",
            RideStatus::Arrived => "ARRIVED",
            RideStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification channel: one per chair and one per user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Channel {
    Chair(ChairId),
    User(UserId),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Chair(id) => write!(f, "chair:{}", id),
            Channel::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// Ride details carried by a status notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideNotification {
    pub ride_id: RideId,
    pub user_id: UserId,
    pub chair_id: Option<ChairId>,
    pub pickup: Coordinate,
    pub destination: Coordinate,
    pub status: RideStatus,
}
