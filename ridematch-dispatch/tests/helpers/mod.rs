//! Test Helper Utilities
//!
//! Shared fixtures for ridematch-dispatch integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use ridematch_common::db::seed::{insert_chair, insert_ride, insert_user, upsert_chair_model};
use ridematch_common::db::{init_memory_database, Chair, RideRequest};
use ridematch_common::events::{Channel, RideNotification};
use ridematch_common::{ChairId, Coordinate, RideId, UserId};
use ridematch_dispatch::config::MatchingConfig;
use ridematch_dispatch::db::{ChairBinding, DispatchStore, SqliteDispatchStore};
use ridematch_dispatch::matching::MatchingEngine;
use ridematch_dispatch::notify::NotificationDispatcher;
use ridematch_dispatch::reservation::ReservationTracker;
use ridematch_dispatch::{Error, Result};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const MODEL: &str = "standard";

/// Fresh in-memory database with one chair model
pub async fn create_test_db() -> SqlitePool {
    let pool = init_memory_database().await.expect("in-memory database");
    upsert_chair_model(&pool, MODEL, 3).await.expect("chair model");
    pool
}

pub async fn seed_user(pool: &SqlitePool, id: &str) {
    insert_user(pool, &UserId::from(id), &format!("user-{}", id))
        .await
        .expect("insert user");
}

pub async fn seed_chair(pool: &SqlitePool, id: &str, location: (i64, i64)) {
    insert_chair(
        pool,
        &ChairId::from(id),
        MODEL,
        true,
        Some(Coordinate::new(location.0, location.1)),
    )
    .await
    .expect("insert chair");
}

/// Ride from `pickup` to ten units east of it, created `age_secs` before `now`
pub async fn seed_ride(
    pool: &SqlitePool,
    id: &str,
    user: &str,
    pickup: (i64, i64),
    age_secs: i64,
    now: DateTime<Utc>,
) {
    insert_ride(
        pool,
        &RideId::from(id),
        &UserId::from(user),
        Coordinate::new(pickup.0, pickup.1),
        Coordinate::new(pickup.0 + 10, pickup.1),
        now - Duration::seconds(age_secs),
    )
    .await
    .expect("insert ride");
}

/// Chair bound to a ride in storage, or `None`
pub async fn assigned_chair(pool: &SqlitePool, ride_id: &str) -> Option<ChairId> {
    sqlx::query_scalar::<_, Option<ChairId>>("SELECT chair_id FROM rides WHERE id = ?")
        .bind(ride_id)
        .fetch_one(pool)
        .await
        .expect("ride row")
}

pub async fn assigned_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rides WHERE chair_id IS NOT NULL")
        .fetch_one(pool)
        .await
        .expect("count")
}

/// Notification dispatcher that records every send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Channel, RideNotification)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(Channel, RideNotification)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl NotificationDispatcher for RecordingNotifier {
    fn send(&self, channel: &Channel, notification: &RideNotification) {
        self.sent
            .lock()
            .unwrap()
            .push((channel.clone(), notification.clone()));
    }
}

/// SQLite store whose `fail_on`-th chunk commit returns an error
pub struct FailingStore {
    inner: SqliteDispatchStore,
    calls: AtomicUsize,
    fail_on: usize,
}

impl FailingStore {
    pub fn new(pool: SqlitePool, fail_on: usize) -> Self {
        Self {
            inner: SqliteDispatchStore::new(pool),
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl DispatchStore for FailingStore {
    async fn waiting_rides(&self) -> Result<Vec<RideRequest>> {
        self.inner.waiting_rides().await
    }

    async fn eligible_chairs(&self) -> Result<Vec<Chair>> {
        self.inner.eligible_chairs().await
    }

    async fn commit_chunk(&self, bindings: &[ChairBinding]) -> Result<Vec<bool>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(Error::Internal("injected write failure".into()));
        }
        self.inner.commit_chunk(bindings).await
    }

    async fn active_bindings(&self) -> Result<Vec<(ChairId, RideId)>> {
        self.inner.active_bindings().await
    }
}

pub struct TestEngine {
    pub engine: Arc<MatchingEngine>,
    pub tracker: Arc<ReservationTracker>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn engine_with_store(store: Arc<dyn DispatchStore>, config: MatchingConfig) -> TestEngine {
    let tracker = Arc::new(ReservationTracker::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = Arc::new(MatchingEngine::new(
        store,
        Arc::clone(&tracker),
        Arc::clone(&notifier) as Arc<dyn NotificationDispatcher>,
        config,
    ));
    TestEngine {
        engine,
        tracker,
        notifier,
    }
}

pub fn create_test_engine(pool: &SqlitePool) -> TestEngine {
    engine_with_store(
        Arc::new(SqliteDispatchStore::new(pool.clone())),
        MatchingConfig::default(),
    )
}
