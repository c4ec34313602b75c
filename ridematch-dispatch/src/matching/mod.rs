//! Dispatch matching
//!
//! One pass loads a snapshot of waiting rides and free chairs, scores every
//! (chair, ride) pair, greedily picks a conflict-free subset and commits it
//! chunk by chunk.
//!
//! - [`candidates`]: cross product of free chairs × waiting rides
//! - [`scoring`]: desirability score with the starvation override
//! - [`selector`]: stable sort and greedy conflict-free selection
//! - [`committer`]: chunked transactional writes, reservations, notifications
//! - [`engine`]: the pass itself

pub mod candidates;
pub mod committer;
pub mod engine;
pub mod scoring;
pub mod selector;
pub mod types;

pub use committer::BatchCommitter;
pub use engine::MatchingEngine;
pub use scoring::ScoringPolicy;
pub use types::{Assignment, Candidate, CommitSummary, MatchOutcome, NoOpReason};
