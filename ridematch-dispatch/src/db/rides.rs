//! Ride queries used by matching

use chrono::{DateTime, Utc};
use ridematch_common::db::RideRequest;
use ridematch_common::{ChairId, RideId};
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::error::Result;

/// Rides still waiting for a chair, oldest id first
pub async fn waiting_rides(db: &Pool<Sqlite>) -> Result<Vec<RideRequest>> {
    let rides = sqlx::query_as::<_, RideRequest>(
        r#"
        SELECT id, user_id, chair_id,
               pickup_latitude, pickup_longitude,
               destination_latitude, destination_longitude,
               created_at
        FROM rides
        WHERE chair_id IS NULL AND completed_at IS NULL
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rides)
}

/// Bind `chair_id` to `ride_id` unless either side was claimed meanwhile
///
/// The write only lands when the ride is still unassigned and the chair has
/// no other uncompleted ride. Returns whether a row changed; `false` means a
/// concurrent pass won the race.
pub async fn assign_chair(
    conn: &mut SqliteConnection,
    ride_id: &RideId,
    chair_id: &ChairId,
    now: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE rides
        SET chair_id = ?, updated_at = ?
        WHERE id = ?
          AND chair_id IS NULL
          AND NOT EXISTS (
              SELECT 1 FROM rides busy
              WHERE busy.chair_id = ? AND busy.completed_at IS NULL
          )
        "#,
    )
    .bind(chair_id)
    .bind(now)
    .bind(ride_id)
    .bind(chair_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// (chair, ride) pairs for rides that have a chair and are not completed
pub async fn active_bindings(db: &Pool<Sqlite>) -> Result<Vec<(ChairId, RideId)>> {
    let rows = sqlx::query_as::<_, (ChairId, RideId)>(
        r#"
        SELECT chair_id, id
        FROM rides
        WHERE chair_id IS NOT NULL AND completed_at IS NULL
        ORDER BY chair_id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}
