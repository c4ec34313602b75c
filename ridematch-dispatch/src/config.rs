//! ridematch-dispatch configuration
//!
//! Matching tunables come from the `[matching]` table of an optional TOML
//! file; anything missing takes the compiled default. Network and storage
//! settings come from the command line (see `main.rs`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_MAX_PICKUP_DISTANCE: i64 = 50;
pub const DEFAULT_STARVATION_AGE_SECS: f64 = 20.0;
pub const DEFAULT_STARVATION_BONUS: f64 = 10_000.0;
pub const DEFAULT_PICKUP_WEIGHT: f64 = 25.0;
pub const DEFAULT_DESTINATION_DIVISOR: f64 = 10.0;
pub const DEFAULT_AGE_WEIGHT: f64 = 10.0;
/// Floor for the wait-age denominator. With the default age weight this caps
/// the age term at 1000, an order of magnitude under the starvation bonus.
pub const MIN_WAIT_AGE_SECS: f64 = 0.01;
pub const DEFAULT_CHUNK_SIZE: usize = 20;
pub const DEFAULT_MAX_MATCHES_PER_PASS: usize = 150;

/// Scoring, filtering and commit tunables for one engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Pickup distance above which a non-starved candidate is rejected
    pub max_pickup_distance: i64,
    /// Wait age (seconds) beyond which a ride is starved
    pub starvation_age_secs: f64,
    /// Score added to starved candidates
    pub starvation_bonus: f64,
    /// Numerator of the pickup term, and the bonus for a co-located chair
    pub pickup_weight: f64,
    /// Destination distance is divided by this
    pub destination_divisor: f64,
    /// Numerator of the wait-age term
    pub age_weight: f64,
    /// Smallest wait age used as a denominator
    pub min_wait_age_secs: f64,
    /// Assignments persisted per storage transaction
    pub chunk_size: usize,
    /// Stop committing further chunks once this many rides matched
    pub max_matches_per_pass: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_pickup_distance: DEFAULT_MAX_PICKUP_DISTANCE,
            starvation_age_secs: DEFAULT_STARVATION_AGE_SECS,
            starvation_bonus: DEFAULT_STARVATION_BONUS,
            pickup_weight: DEFAULT_PICKUP_WEIGHT,
            destination_divisor: DEFAULT_DESTINATION_DIVISOR,
            age_weight: DEFAULT_AGE_WEIGHT,
            min_wait_age_secs: MIN_WAIT_AGE_SECS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_matches_per_pass: DEFAULT_MAX_MATCHES_PER_PASS,
        }
    }
}

impl MatchingConfig {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be at least 1".into()));
        }
        if self.max_matches_per_pass == 0 {
            return Err(Error::Config("max_matches_per_pass must be at least 1".into()));
        }
        if self.max_pickup_distance < 0 {
            return Err(Error::Config("max_pickup_distance must not be negative".into()));
        }
        if !(self.starvation_age_secs > 0.0) {
            return Err(Error::Config("starvation_age_secs must be positive".into()));
        }
        if !(self.starvation_bonus > 0.0) {
            return Err(Error::Config("starvation_bonus must be positive".into()));
        }
        if !(self.destination_divisor > 0.0) {
            return Err(Error::Config("destination_divisor must be positive".into()));
        }
        if !(self.min_wait_age_secs > 0.0) {
            return Err(Error::Config("min_wait_age_secs must be positive".into()));
        }
        if !(self.pickup_weight >= 0.0) {
            return Err(Error::Config("pickup_weight must not be negative".into()));
        }
        if !(self.age_weight >= 0.0) {
            return Err(Error::Config("age_weight must not be negative".into()));
        }

        // Largest pickup term plus largest age term a fresh ride can reach
        let fresh_ceiling = self.pickup_weight + self.age_weight / self.min_wait_age_secs;
        if !(fresh_ceiling < self.starvation_bonus) {
            return Err(Error::Config(format!(
                "starvation_bonus ({}) must exceed pickup_weight + age_weight / min_wait_age_secs ({})",
                self.starvation_bonus, fresh_ceiling
            )));
        }
        Ok(())
    }
}

/// Layout of the TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub matching: MatchingConfig,
}

impl FileConfig {
    /// Load from `path`; a missing file yields defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: FileConfig = ridematch_common::config::load_toml_or_default(path)?;
        config.matching.validate()?;
        Ok(config)
    }
}

/// Dispatch service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: PathBuf,
    /// In-process trigger period; `None` leaves triggering to an external scheduler
    pub match_interval: Option<Duration>,
    pub matching: MatchingConfig,
}
