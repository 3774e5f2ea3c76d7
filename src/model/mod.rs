//! Over 1.5 goals probability estimation and top-pick ranking.
//!
//! Everything in here is synchronous and free of I/O: callers hand in
//! already-structured statistics and get probabilities or ranked picks back.

pub mod calculator;
pub mod evaluation;
pub mod probability;
pub mod ranking;
pub mod record;

pub use calculator::{calculate, outcome_probabilities, OutcomeProbabilities};
pub use evaluation::{evaluate, Metrics, Outcome};
pub use probability::{estimate, BlendWeights, TeamStat};
pub use ranking::{rank, RankedPick, RankingPolicy, DEFAULT_LIMIT};
pub use record::{FixtureRow, MatchRecord};

use thiserror::Error;

/// Conditions the core reports instead of guessing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A required statistic is missing for the named team.
    #[error("insufficient data for {team}: no historical over 1.5 rate")]
    DataInsufficient { team: String },

    /// An input row failed shape validation.
    #[error("malformed record: {field} {reason}")]
    MalformedRecord { field: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ModelError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        ModelError::MalformedRecord {
            field,
            reason: reason.into(),
        }
    }
}

/// True when `v` is a usable probability.
pub(crate) fn is_probability(v: f64) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}
