//! Candidate generation
//!
//! Enumeration is chair-major, ride-minor: every waiting ride is paired with
//! the first free chair, then the second, and so on. Both inputs arrive
//! ordered by id, so equal-score candidates always come out in the same
//! order for the same snapshot.

use chrono::{DateTime, Utc};
use ridematch_common::db::{Chair, RideRequest};
use ridematch_common::geo::distance;
use ridematch_common::time::seconds_between;
use ridematch_common::ChairId;
use std::collections::HashSet;

use super::scoring::ScoringPolicy;
use super::types::Candidate;

/// Drop chairs that hold a reservation or have no known position
pub fn free_chairs(chairs: Vec<Chair>, reserved: &HashSet<ChairId>) -> Vec<Chair> {
    chairs
        .into_iter()
        .filter(|chair| chair.is_active && chair.location.is_some() && !reserved.contains(&chair.id))
        .collect()
}

/// Score every (chair, ride) pair
pub fn generate_candidates<'a>(
    rides: &'a [RideRequest],
    chairs: &'a [Chair],
    policy: &ScoringPolicy,
    now: DateTime<Utc>,
) -> Vec<Candidate<'a>> {
    let mut candidates = Vec::with_capacity(rides.len() * chairs.len());

    for chair in chairs {
        let Some(chair_location) = chair.location else {
            continue;
        };
        for ride in rides {
            let pickup_distance = distance(chair_location, ride.pickup);
            let destination_distance = distance(ride.pickup, ride.destination);
            let wait_age_secs = seconds_between(ride.created_at, now);
            let score = policy.score(pickup_distance, destination_distance, wait_age_secs);

            candidates.push(Candidate {
                ride,
                chair,
                pickup_distance,
                destination_distance,
                wait_age_secs,
                score: score.value,
                starved: score.starved,
            });
        }
    }

    candidates
}
