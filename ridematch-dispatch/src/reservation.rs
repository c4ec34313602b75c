//! Reservation tracker
//!
//! Records which chair is committed to which ride so that overlapping
//! matching passes never hand the same chair out twice. One tracker belongs
//! to one engine instance and is shared (behind `Arc`) by every pass that
//! engine runs.
//!
//! Claims are two-phase. `try_claim` atomically checks and inserts a
//! `Pending` entry before a chunk is written; `confirm` promotes it once the
//! chunk commits and `abandon` drops it if the write never landed. Confirmed
//! entries are only removed through `release`, called by the ride lifecycle
//! when the trip ends.
//!
//! The lock is held for single operations only, never across a pass.

use chrono::{DateTime, Utc};
use ridematch_common::{ChairId, RideId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Error, Result};

/// Lifecycle of a single reservation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationState {
    /// Claimed by a pass whose chunk has not committed yet
    Pending,
    /// Chunk committed; the chair is serving the ride
    Confirmed,
}

/// A chair's current commitment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub chair_id: ChairId,
    pub ride_id: RideId,
    pub state: ReservationState,
    pub since: DateTime<Utc>,
}

/// Result of an atomic claim attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    /// The chair already holds this other ride
    ChairTaken(RideId),
    /// The ride is already held by this other chair
    RideTaken(ChairId),
}

#[derive(Debug, Default)]
struct Inner {
    by_chair: HashMap<ChairId, Reservation>,
    by_ride: HashMap<RideId, ChairId>,
}

impl Inner {
    fn insert(&mut self, reservation: Reservation) {
        self.by_ride
            .insert(reservation.ride_id.clone(), reservation.chair_id.clone());
        self.by_chair
            .insert(reservation.chair_id.clone(), reservation);
    }

    fn remove(&mut self, chair_id: &ChairId) -> Option<Reservation> {
        let reservation = self.by_chair.remove(chair_id)?;
        self.by_ride.remove(&reservation.ride_id);
        Some(reservation)
    }
}

/// Concurrency-safe chair → ride reservation map
#[derive(Debug, Default)]
pub struct ReservationTracker {
    inner: RwLock<Inner>,
}

impl ReservationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the chair holds a pending or confirmed reservation
    pub async fn is_reserved(&self, chair_id: &ChairId) -> bool {
        self.inner.read().await.by_chair.contains_key(chair_id)
    }

    /// All chairs currently holding a reservation
    pub async fn reserved_chairs(&self) -> HashSet<ChairId> {
        self.inner.read().await.by_chair.keys().cloned().collect()
    }

    /// The chair currently bound to `ride_id`, if any
    pub async fn chair_for_ride(&self, ride_id: &RideId) -> Option<ChairId> {
        self.inner.read().await.by_ride.get(ride_id).cloned()
    }

    /// Atomically claim `chair_id` for `ride_id`
    ///
    /// Fails without side effects when either side is already reserved.
    pub async fn try_claim(&self, chair_id: &ChairId, ride_id: &RideId) -> ClaimOutcome {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.by_chair.get(chair_id) {
            return ClaimOutcome::ChairTaken(existing.ride_id.clone());
        }
        if let Some(holder) = inner.by_ride.get(ride_id) {
            return ClaimOutcome::RideTaken(holder.clone());
        }

        inner.insert(Reservation {
            chair_id: chair_id.clone(),
            ride_id: ride_id.clone(),
            state: ReservationState::Pending,
            since: Utc::now(),
        });
        ClaimOutcome::Claimed
    }

    /// Promote a pending claim after its chunk committed
    pub async fn confirm(&self, chair_id: &ChairId, ride_id: &RideId) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.by_chair.get_mut(chair_id) {
            Some(reservation) if &reservation.ride_id == ride_id => {
                reservation.state = ReservationState::Confirmed;
                reservation.since = Utc::now();
                Ok(())
            }
            Some(reservation) => Err(Error::Reservation(format!(
                "chair {} is reserved for ride {}, not {}",
                chair_id, reservation.ride_id, ride_id
            ))),
            None => Err(Error::Reservation(format!(
                "chair {} has no pending claim for ride {}",
                chair_id, ride_id
            ))),
        }
    }

    /// Drop a pending claim whose write did not land
    ///
    /// Confirmed entries and claims for other rides are left alone.
    pub async fn abandon(&self, chair_id: &ChairId, ride_id: &RideId) -> bool {
        let mut inner = self.inner.write().await;
        let is_own_pending = inner.by_chair.get(chair_id).is_some_and(|r| {
            &r.ride_id == ride_id && r.state == ReservationState::Pending
        });
        if is_own_pending {
            inner.remove(chair_id);
            debug!(chair_id = %chair_id, ride_id = %ride_id, "Abandoned pending claim");
        }
        is_own_pending
    }

    /// Clear a chair's reservation once its ride has ended
    pub async fn release(&self, chair_id: &ChairId) -> Option<Reservation> {
        self.inner.write().await.remove(chair_id)
    }

    /// Seed confirmed reservations, e.g. from storage after a restart
    ///
    /// Entries whose chair or ride is already present are skipped. Returns
    /// the number inserted.
    pub async fn hydrate<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (ChairId, RideId)>,
    {
        let mut inner = self.inner.write().await;
        let mut inserted = 0;
        for (chair_id, ride_id) in entries {
            if inner.by_chair.contains_key(&chair_id) || inner.by_ride.contains_key(&ride_id) {
                continue;
            }
            inner.insert(Reservation {
                chair_id,
                ride_id,
                state: ReservationState::Confirmed,
                since: Utc::now(),
            });
            inserted += 1;
        }
        inserted
    }

    /// All reservations ordered by chair id
    pub async fn snapshot(&self) -> Vec<Reservation> {
        let inner = self.inner.read().await;
        let mut reservations: Vec<_> = inner.by_chair.values().cloned().collect();
        reservations.sort_by(|a, b| a.chair_id.cmp(&b.chair_id));
        reservations
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_chair.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_chair.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn chair(id: &str) -> ChairId {
        ChairId::from(id)
    }

    fn ride(id: &str) -> RideId {
        RideId::from(id)
    }

    #[tokio::test]
    async fn test_claim_then_confirm() {
        let tracker = ReservationTracker::new();
        assert_eq!(tracker.try_claim(&chair("c1"), &ride("r1")).await, ClaimOutcome::Claimed);
        assert!(tracker.is_reserved(&chair("c1")).await);

        tracker.confirm(&chair("c1"), &ride("r1")).await.unwrap();
        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].state, ReservationState::Confirmed);
        assert_eq!(tracker.chair_for_ride(&ride("r1")).await, Some(chair("c1")));
    }

    #[tokio::test]
    async fn test_chair_cannot_be_claimed_twice() {
        let tracker = ReservationTracker::new();
        tracker.try_claim(&chair("c1"), &ride("r1")).await;
        assert_eq!(
            tracker.try_claim(&chair("c1"), &ride("r2")).await,
            ClaimOutcome::ChairTaken(ride("r1"))
        );
    }

    #[tokio::test]
    async fn test_ride_cannot_be_held_by_two_chairs() {
        let tracker = ReservationTracker::new();
        tracker.try_claim(&chair("c1"), &ride("r1")).await;
        assert_eq!(
            tracker.try_claim(&chair("c2"), &ride("r1")).await,
            ClaimOutcome::RideTaken(chair("c1"))
        );
        assert!(!tracker.is_reserved(&chair("c2")).await);
    }

    #[tokio::test]
    async fn test_abandon_only_drops_own_pending_claim() {
        let tracker = ReservationTracker::new();
        tracker.try_claim(&chair("c1"), &ride("r1")).await;
        tracker.try_claim(&chair("c2"), &ride("r2")).await;
        tracker.confirm(&chair("c2"), &ride("r2")).await.unwrap();

        assert!(!tracker.abandon(&chair("c1"), &ride("other")).await);
        assert!(!tracker.abandon(&chair("c2"), &ride("r2")).await);
        assert!(tracker.abandon(&chair("c1"), &ride("r1")).await);

        assert!(!tracker.is_reserved(&chair("c1")).await);
        assert!(tracker.is_reserved(&chair("c2")).await);
        assert_eq!(tracker.chair_for_ride(&ride("r1")).await, None);
    }

    #[tokio::test]
    async fn test_confirm_without_claim_fails() {
        let tracker = ReservationTracker::new();
        assert!(tracker.confirm(&chair("c1"), &ride("r1")).await.is_err());
    }

    #[tokio::test]
    async fn test_release_frees_chair_and_ride() {
        let tracker = ReservationTracker::new();
        tracker.try_claim(&chair("c1"), &ride("r1")).await;
        tracker.confirm(&chair("c1"), &ride("r1")).await.unwrap();

        let released = tracker.release(&chair("c1")).await.unwrap();
        assert_eq!(released.ride_id, ride("r1"));
        assert!(tracker.is_empty().await);
        assert_eq!(tracker.try_claim(&chair("c2"), &ride("r1")).await, ClaimOutcome::Claimed);
    }

    #[tokio::test]
    async fn test_hydrate_skips_conflicts() {
        let tracker = ReservationTracker::new();
        let inserted = tracker
            .hydrate(vec![
                (chair("c1"), ride("r1")),
                (chair("c1"), ride("r2")),
                (chair("c2"), ride("r1")),
                (chair("c3"), ride("r3")),
            ])
            .await;
        assert_eq!(inserted, 2);
        assert_eq!(tracker.len().await, 2);
        assert!(tracker
            .snapshot()
            .await
            .iter()
            .all(|r| r.state == ReservationState::Confirmed));
    }

    #[tokio::test]
    async fn test_concurrent_claims_on_one_chair_have_single_winner() {
        let tracker = Arc::new(ReservationTracker::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                tracker
                    .try_claim(&ChairId::from("c1"), &RideId::new(format!("r{}", i)))
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() == ClaimOutcome::Claimed {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
