//! Chair queries used by matching

use ridematch_common::db::Chair;
use sqlx::{Pool, Sqlite};

use crate::error::Result;

/// Chairs that may take a new ride, ordered by id
///
/// Eligible means active, with a known position, and not bound to any
/// uncompleted ride in storage. The speed comes from the chair's model and
/// is absent when the model is unknown.
pub async fn eligible_chairs(db: &Pool<Sqlite>) -> Result<Vec<Chair>> {
    let chairs = sqlx::query_as::<_, Chair>(
        r#"
        SELECT c.id, c.latitude, c.longitude, c.is_active, m.speed
        FROM chairs c
        LEFT JOIN chair_models m ON c.model = m.name
        WHERE c.is_active = 1
          AND c.latitude IS NOT NULL
          AND c.longitude IS NOT NULL
          AND NOT EXISTS (
              SELECT 1 FROM rides r
              WHERE r.chair_id = c.id AND r.completed_at IS NULL
          )
        ORDER BY c.id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(chairs)
}
