//! Grid coordinates and distance
//!
//! Chair and ride positions live on an integer grid. Distance between two
//! points is the Manhattan distance, so co-located points have distance
//! exactly zero.

use serde::{Deserialize, Serialize};

/// A point on the dispatch grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: i64,
    pub longitude: i64,
}

impl Coordinate {
    pub const fn new(latitude: i64, longitude: i64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance to another point in grid units
    pub fn distance_to(&self, other: &Coordinate) -> i64 {
        distance(*self, *other)
    }
}

/// Manhattan distance between two grid points
///
/// Saturates at `i64::MAX` for points at opposite ends of the grid.
pub fn distance(a: Coordinate, b: Coordinate) -> i64 {
    let total = a
        .latitude
        .abs_diff(b.latitude)
        .saturating_add(a.longitude.abs_diff(b.longitude));
    i64::try_from(total).unwrap_or(i64::MAX)
}
