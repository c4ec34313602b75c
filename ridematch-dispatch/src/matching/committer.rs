//! Chunked commit of accepted assignments
//!
//! Assignments are written in fixed-size chunks, one storage transaction per
//! chunk. Before a chunk is written every chair in it is claimed in the
//! reservation tracker; claims that lose to a concurrent pass are skipped.
//! Notifications go out only after the chunk's transaction commits.
//!
//! A failing chunk rolls back alone: earlier chunks stay committed and later
//! chunks are not attempted.

use ridematch_common::events::{Channel, RideStatus};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::types::{Assignment, CommitSummary};
use crate::db::{ChairBinding, DispatchStore};
use crate::error::{Error, Result};
use crate::notify::NotificationDispatcher;
use crate::reservation::{ClaimOutcome, ReservationTracker};

/// Persists accepted assignments and announces them
pub struct BatchCommitter {
    store: Arc<dyn DispatchStore>,
    tracker: Arc<ReservationTracker>,
    notifier: Arc<dyn NotificationDispatcher>,
    chunk_size: usize,
    max_matches: usize,
}

impl BatchCommitter {
    pub fn new(
        store: Arc<dyn DispatchStore>,
        tracker: Arc<ReservationTracker>,
        notifier: Arc<dyn NotificationDispatcher>,
        chunk_size: usize,
        max_matches: usize,
    ) -> Self {
        Self {
            store,
            tracker,
            notifier,
            chunk_size: chunk_size.max(1),
            max_matches,
        }
    }

    /// Commit `assignments` in order, best first
    ///
    /// Stops before the next chunk once `max_matches` rides are matched; the
    /// rest are reported as deferred and picked up by a later pass. On a
    /// storage error the current chunk's claims are dropped and the error
    /// carries how many matches earlier chunks committed.
    pub async fn commit(&self, assignments: Vec<Assignment>) -> Result<CommitSummary> {
        let mut summary = CommitSummary::default();
        let total = assignments.len();
        let mut consumed = 0;

        for (index, chunk) in assignments.chunks(self.chunk_size).enumerate() {
            if summary.matched >= self.max_matches {
                summary.deferred = total - consumed;
                debug!(
                    deferred = summary.deferred,
                    cap = self.max_matches,
                    "Match cap reached, deferring remaining assignments"
                );
                break;
            }
            consumed += chunk.len();

            let claimed = self.claim_chunk(chunk, &mut summary).await;
            if claimed.is_empty() {
                continue;
            }

            let bindings: Vec<ChairBinding> = claimed
                .iter()
                .map(|a| ChairBinding {
                    ride_id: a.ride.id.clone(),
                    chair_id: a.chair_id.clone(),
                })
                .collect();

            let applied = match self.store.commit_chunk(&bindings).await {
                Ok(applied) => applied,
                Err(e) => {
                    for assignment in &claimed {
                        self.tracker.abandon(&assignment.chair_id, &assignment.ride.id).await;
                    }
                    error!(chunk = index, committed = summary.matched, "Chunk commit failed: {}", e);
                    return Err(Error::ChunkCommit {
                        chunk: index,
                        committed: summary.matched,
                        source: Box::new(e),
                    });
                }
            };
            summary.chunks += 1;

            for (assignment, landed) in claimed.iter().zip(applied) {
                if landed {
                    self.finish(assignment).await;
                    summary.matched += 1;
                } else {
                    self.tracker.abandon(&assignment.chair_id, &assignment.ride.id).await;
                    summary.skipped += 1;
                    warn!(
                        ride_id = %assignment.ride.id,
                        chair_id = %assignment.chair_id,
                        "Assignment lost to a concurrent write"
                    );
                }
            }
        }

        Ok(summary)
    }

    async fn claim_chunk<'a>(&self, chunk: &'a [Assignment], summary: &mut CommitSummary) -> Vec<&'a Assignment> {
        let mut claimed = Vec::with_capacity(chunk.len());
        for assignment in chunk {
            match self.tracker.try_claim(&assignment.chair_id, &assignment.ride.id).await {
                ClaimOutcome::Claimed => claimed.push(assignment),
                ClaimOutcome::ChairTaken(other_ride) => {
                    summary.skipped += 1;
                    warn!(
                        ride_id = %assignment.ride.id,
                        chair_id = %assignment.chair_id,
                        held_for = %other_ride,
                        "Chair already reserved, skipping"
                    );
                }
                ClaimOutcome::RideTaken(other_chair) => {
                    summary.skipped += 1;
                    warn!(
                        ride_id = %assignment.ride.id,
                        chair_id = %assignment.chair_id,
                        held_by = %other_chair,
                        "Ride already reserved, skipping"
                    );
                }
            }
        }
        claimed
    }

    async fn finish(&self, assignment: &Assignment) {
        if let Err(e) = self
            .tracker
            .confirm(&assignment.chair_id, &assignment.ride.id)
            .await
        {
            // The row is committed regardless; keep going so the parties hear about it
            error!("Failed to confirm reservation: {}", e);
        }

        debug!(
            ride_id = %assignment.ride.id,
            chair_id = %assignment.chair_id,
            score = assignment.score,
            pickup_distance = assignment.pickup_distance,
            destination_distance = assignment.destination_distance,
            wait_age_secs = assignment.wait_age_secs,
            starved = assignment.starved,
            chair_speed = ?assignment.chair_speed,
            "Matched"
        );

        let notification = assignment
            .ride
            .notification(Some(&assignment.chair_id), RideStatus::Matching);
        self.notifier
            .send(&Channel::Chair(assignment.chair_id.clone()), &notification);
        self.notifier
            .send(&Channel::User(assignment.ride.user_id.clone()), &notification);
    }
}
