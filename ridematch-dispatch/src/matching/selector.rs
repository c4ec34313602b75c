//! Greedy assignment selection
//!
//! Candidates are stably sorted best-first and walked once. A candidate is
//! taken unless its ride or chair is already taken, or its chair is farther
//! than `max_pickup_distance` from the pickup and the ride is not starved.
//! Rejected-by-distance candidates do not consume the ride or chair, so a
//! closer pairing further down the list can still use them.
//!
//! This is a heuristic, not a maximum-weight matching.

use ridematch_common::{ChairId, RideId};
use std::cmp::Ordering;
use std::collections::HashSet;

use super::types::{Assignment, Candidate};

/// Best-first order: starved candidates first, then by descending score
///
/// Ties keep generation order (`sort_by` is stable).
pub fn rank_candidates(candidates: &mut [Candidate<'_>]) {
    candidates.sort_by(compare_candidates);
}

fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.starved
        .cmp(&a.starved)
        .then_with(|| b.score.total_cmp(&a.score))
}

/// Pick a conflict-free set of assignments, best first
pub fn select_assignments(mut candidates: Vec<Candidate<'_>>, max_pickup_distance: i64) -> Vec<Assignment> {
    rank_candidates(&mut candidates);

    let mut used_rides: HashSet<&RideId> = HashSet::new();
    let mut used_chairs: HashSet<&ChairId> = HashSet::new();
    let mut accepted = Vec::new();

    for candidate in &candidates {
        if used_rides.contains(&candidate.ride.id) || used_chairs.contains(&candidate.chair.id) {
            continue;
        }
        // Waived by the starved flag rather than a score threshold, so the
        // waiver holds whatever the configured weights add up to
        if candidate.pickup_distance > max_pickup_distance && !candidate.starved {
            continue;
        }

        used_rides.insert(&candidate.ride.id);
        used_chairs.insert(&candidate.chair.id);
        accepted.push(Assignment::from(candidate));
    }

    accepted
}
