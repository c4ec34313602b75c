//! Tests for database initialization and the row helpers

use chrono::{Duration, Utc};
use ridematch_common::db::seed::{
    complete_ride, insert_chair, insert_ride, insert_user, upsert_chair_model,
};
use ridematch_common::db::{init_database, init_memory_database, Chair, RideRequest};
use ridematch_common::{ChairId, Coordinate, RideId, UserId};
use std::path::PathBuf;

fn temp_db_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "ridematch-test-{}-{}-{}.db",
        tag,
        std::process::id(),
        uuid::Uuid::new_v4()
    ))
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let db_path = temp_db_path("create");
    let _ = std::fs::remove_file(&db_path);

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");

    drop(result);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_database_opens_existing() {
    let db_path = temp_db_path("existing");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());

    // Schema creation is idempotent
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    drop(pool1);
    drop(pool2);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_all_tables_created() {
    let pool = init_memory_database().await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(tables, vec!["chair_models", "chairs", "rides", "users"]);
}

#[tokio::test]
async fn test_ride_round_trips_through_model() {
    let pool = init_memory_database().await.unwrap();
    let user = UserId::from("u1");
    let ride = RideId::from("r1");
    let created_at = Utc::now() - Duration::seconds(3);

    insert_user(&pool, &user, "alice").await.unwrap();
    insert_ride(&pool, &ride, &user, Coordinate::new(1, 2), Coordinate::new(30, 40), created_at)
        .await
        .unwrap();

    let loaded: RideRequest = sqlx::query_as("SELECT * FROM rides WHERE id = ?")
        .bind(&ride)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(loaded.id, ride);
    assert_eq!(loaded.user_id, user);
    assert_eq!(loaded.chair_id, None);
    assert_eq!(loaded.pickup, Coordinate::new(1, 2));
    assert_eq!(loaded.destination, Coordinate::new(30, 40));
    assert_eq!(loaded.created_at.timestamp_millis(), created_at.timestamp_millis());
}

#[tokio::test]
async fn test_chair_without_location_loads_as_unknown() {
    let pool = init_memory_database().await.unwrap();
    upsert_chair_model(&pool, "basic", 3).await.unwrap();
    insert_chair(&pool, &ChairId::from("c1"), "basic", true, None)
        .await
        .unwrap();

    let chair: Chair = sqlx::query_as(
        "SELECT c.id, c.latitude, c.longitude, c.is_active, m.speed \
         FROM chairs c LEFT JOIN chair_models m ON c.model = m.name WHERE c.id = ?",
    )
    .bind("c1")
    .fetch_one(&pool)
    .await
    .unwrap();

    assert!(chair.is_active);
    assert_eq!(chair.location, None);
    assert_eq!(chair.speed, Some(3));
}

#[tokio::test]
async fn test_complete_ride_sets_completion() {
    let pool = init_memory_database().await.unwrap();
    let user = UserId::from("u1");
    let ride = RideId::from("r1");
    insert_user(&pool, &user, "alice").await.unwrap();
    insert_ride(&pool, &ride, &user, Coordinate::new(0, 0), Coordinate::new(5, 5), Utc::now())
        .await
        .unwrap();

    let affected = complete_ride(&pool, &ride, 5, Utc::now()).await.unwrap();
    assert_eq!(affected, 1);

    let evaluation: Option<i64> = sqlx::query_scalar("SELECT evaluation FROM rides WHERE id = ?")
        .bind(&ride)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(evaluation, Some(5));
}
