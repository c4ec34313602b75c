//! Candidate scoring
//!
//! ```text
//! score = pickup + destination + age + starvation
//! pickup      = W_p / pickup_distance        (W_p when co-located)
//! destination = destination_distance / D
//! age         = W_a / max(wait_age, floor)
//! starvation  = bonus when wait_age > threshold, else 0
//! ```
//!
//! Close chairs score non-linearly higher, longer trips linearly higher and
//! fresh rides mildly higher, until a ride has waited past the threshold:
//! from then on the bonus outranks every non-starved candidate.

use crate::config::MatchingConfig;

/// A computed score and whether the starvation override applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub value: f64,
    pub starved: bool,
}

/// Weights and thresholds of the scoring function
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    pub pickup_weight: f64,
    pub destination_divisor: f64,
    pub age_weight: f64,
    pub min_wait_age_secs: f64,
    pub starvation_age_secs: f64,
    pub starvation_bonus: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::from(&MatchingConfig::default())
    }
}

impl From<&MatchingConfig> for ScoringPolicy {
    fn from(config: &MatchingConfig) -> Self {
        Self {
            pickup_weight: config.pickup_weight,
            destination_divisor: config.destination_divisor,
            age_weight: config.age_weight,
            min_wait_age_secs: config.min_wait_age_secs,
            starvation_age_secs: config.starvation_age_secs,
            starvation_bonus: config.starvation_bonus,
        }
    }
}

impl ScoringPolicy {
    pub fn pickup_term(&self, pickup_distance: i64) -> f64 {
        if pickup_distance == 0 {
            self.pickup_weight
        } else {
            self.pickup_weight / pickup_distance as f64
        }
    }

    pub fn destination_term(&self, destination_distance: i64) -> f64 {
        destination_distance as f64 / self.destination_divisor
    }

    /// Zero and negative ages are floored before dividing
    pub fn age_term(&self, wait_age_secs: f64) -> f64 {
        self.age_weight / wait_age_secs.max(self.min_wait_age_secs)
    }

    pub fn is_starved(&self, wait_age_secs: f64) -> bool {
        wait_age_secs > self.starvation_age_secs
    }

    pub fn score(&self, pickup_distance: i64, destination_distance: i64, wait_age_secs: f64) -> Score {
        let starved = self.is_starved(wait_age_secs);
        let mut value = self.pickup_term(pickup_distance)
            + self.destination_term(destination_distance)
            + self.age_term(wait_age_secs);
        if starved {
            value += self.starvation_bonus;
        }
        Score { value, starved }
    }
}
