//! Row insertion helpers
//!
//! Rides and chairs are normally written by the ride lifecycle and chair
//! services. These helpers cover the same inserts for local demos, fixtures
//! and tests.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::geo::Coordinate;
use crate::ids::{ChairId, RideId, UserId};
use crate::Result;

pub async fn insert_user(pool: &SqlitePool, id: &UserId, username: &str) -> Result<()> {
    sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
        .bind(id)
        .bind(username)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn upsert_chair_model(pool: &SqlitePool, name: &str, speed: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chair_models (name, speed)
        VALUES (?, ?)
        ON CONFLICT(name) DO UPDATE SET speed = excluded.speed
        "#,
    )
    .bind(name)
    .bind(speed)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert a chair; `location = None` leaves its position unknown
pub async fn insert_chair(
    pool: &SqlitePool,
    id: &ChairId,
    model: &str,
    is_active: bool,
    location: Option<Coordinate>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chairs (id, name, model, is_active, latitude, longitude)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(id.as_str())
    .bind(model)
    .bind(is_active)
    .bind(location.map(|c| c.latitude))
    .bind(location.map(|c| c.longitude))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_ride(
    pool: &SqlitePool,
    id: &RideId,
    user_id: &UserId,
    pickup: Coordinate,
    destination: Coordinate,
    created_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO rides (
            id, user_id,
            pickup_latitude, pickup_longitude,
            destination_latitude, destination_longitude,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(pickup.latitude)
    .bind(pickup.longitude)
    .bind(destination.latitude)
    .bind(destination.longitude)
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Mark a ride finished; the chair becomes eligible again in storage
pub async fn complete_ride(
    pool: &SqlitePool,
    id: &RideId,
    evaluation: i64,
    completed_at: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE rides SET evaluation = ?, completed_at = ?, updated_at = ? WHERE id = ?",
    )
    .bind(evaluation)
    .bind(completed_at)
    .bind(completed_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
