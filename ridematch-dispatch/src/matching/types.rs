use ridematch_common::db::{Chair, RideRequest};
use ridematch_common::ChairId;
use serde::Serialize;

/// A scored (chair, ride) pairing considered during one pass
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub ride: &'a RideRequest,
    pub chair: &'a Chair,
    pub pickup_distance: i64,
    pub destination_distance: i64,
    pub wait_age_secs: f64,
    pub score: f64,
    /// Waited past the starvation threshold; exempt from distance rejection
    pub starved: bool,
}

/// A candidate accepted by the selector, detached from the pass snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub ride: RideRequest,
    pub chair_id: ChairId,
    pub chair_speed: Option<i64>,
    pub pickup_distance: i64,
    pub destination_distance: i64,
    pub wait_age_secs: f64,
    pub score: f64,
    pub starved: bool,
}

impl From<&Candidate<'_>> for Assignment {
    fn from(candidate: &Candidate<'_>) -> Self {
        Self {
            ride: candidate.ride.clone(),
            chair_id: candidate.chair.id.clone(),
            chair_speed: candidate.chair.speed,
            pickup_distance: candidate.pickup_distance,
            destination_distance: candidate.destination_distance,
            wait_age_secs: candidate.wait_age_secs,
            score: candidate.score,
            starved: candidate.starved,
        }
    }
}

/// Why a pass ended without writing anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    NoWaitingRides,
    NoEligibleChairs,
    NoAcceptableCandidates,
}

/// What the committer did with the accepted assignments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    /// Rides bound to a chair and notified
    pub matched: usize,
    /// Assignments dropped because a concurrent pass claimed the chair or ride
    pub skipped: usize,
    /// Assignments left for the next pass once the match cap was reached
    pub deferred: usize,
    /// Chunks committed
    pub chunks: usize,
}

/// Result of one matching pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    NoOp { reason: NoOpReason },
    Matched(CommitSummary),
}

impl MatchOutcome {
    /// Rides matched by the pass
    pub fn matched(&self) -> usize {
        match self {
            MatchOutcome::NoOp { .. } => 0,
            MatchOutcome::Matched(summary) => summary.matched,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, MatchOutcome::NoOp { .. })
    }
}
