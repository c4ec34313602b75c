//! Matching pass orchestration
//!
//! A pass is self-contained: it reads its own snapshot, decides and commits.
//! Passes may overlap; the shared reservation tracker and the conditional
//! ride write keep them from assigning the same chair or ride twice.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::candidates::{free_chairs, generate_candidates};
use super::committer::BatchCommitter;
use super::scoring::ScoringPolicy;
use super::selector::select_assignments;
use super::types::{MatchOutcome, NoOpReason};
use crate::config::MatchingConfig;
use crate::db::DispatchStore;
use crate::error::Result;
use crate::notify::NotificationDispatcher;
use crate::reservation::ReservationTracker;

/// Runs matching passes against one store
pub struct MatchingEngine {
    store: Arc<dyn DispatchStore>,
    tracker: Arc<ReservationTracker>,
    policy: ScoringPolicy,
    committer: BatchCommitter,
    config: MatchingConfig,
}

impl MatchingEngine {
    pub fn new(
        store: Arc<dyn DispatchStore>,
        tracker: Arc<ReservationTracker>,
        notifier: Arc<dyn NotificationDispatcher>,
        config: MatchingConfig,
    ) -> Self {
        let committer = BatchCommitter::new(
            Arc::clone(&store),
            Arc::clone(&tracker),
            notifier,
            config.chunk_size,
            config.max_matches_per_pass,
        );

        Self {
            store,
            tracker,
            policy: ScoringPolicy::from(&config),
            committer,
            config,
        }
    }

    pub fn tracker(&self) -> &Arc<ReservationTracker> {
        &self.tracker
    }

    /// Load chairs already bound to uncompleted rides into the tracker
    ///
    /// Called once at startup so reservations survive a restart.
    pub async fn hydrate_reservations(&self) -> Result<usize> {
        let bindings = self.store.active_bindings().await?;
        let found = bindings.len();
        let inserted = self.tracker.hydrate(bindings).await;
        info!("Hydrated {} reservations ({} active rides in storage)", inserted, found);
        Ok(inserted)
    }

    /// Run one pass against the current time
    pub async fn run_pass(&self) -> Result<MatchOutcome> {
        self.run_pass_at(Utc::now()).await
    }

    /// Run one pass, measuring wait ages against `now`
    pub async fn run_pass_at(&self, now: DateTime<Utc>) -> Result<MatchOutcome> {
        let started = Instant::now();

        let rides = self.store.waiting_rides().await?;
        if rides.is_empty() {
            debug!("No waiting rides");
            return Ok(MatchOutcome::NoOp {
                reason: NoOpReason::NoWaitingRides,
            });
        }

        let reserved = self.tracker.reserved_chairs().await;
        let chairs = free_chairs(self.store.eligible_chairs().await?, &reserved);
        if chairs.is_empty() {
            debug!(waiting = rides.len(), "No eligible chairs");
            return Ok(MatchOutcome::NoOp {
                reason: NoOpReason::NoEligibleChairs,
            });
        }

        let candidates = generate_candidates(&rides, &chairs, &self.policy, now);
        let candidate_count = candidates.len();
        let assignments = select_assignments(candidates, self.config.max_pickup_distance);
        if assignments.is_empty() {
            debug!(
                waiting = rides.len(),
                chairs = chairs.len(),
                candidates = candidate_count,
                "No acceptable candidates"
            );
            return Ok(MatchOutcome::NoOp {
                reason: NoOpReason::NoAcceptableCandidates,
            });
        }

        let accepted = assignments.len();
        let summary = self.committer.commit(assignments).await?;

        info!(
            waiting = rides.len(),
            chairs = chairs.len(),
            candidates = candidate_count,
            accepted,
            matched = summary.matched,
            skipped = summary.skipped,
            deferred = summary.deferred,
            chunks = summary.chunks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Matching pass complete"
        );

        Ok(MatchOutcome::Matched(summary))
    }
}
