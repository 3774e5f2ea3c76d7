//! Daily top-N selection.
//!
//! A match qualifies when its historical rate and its model probability both
//! clear their thresholds strictly. Qualifiers are ordered by model
//! probability, then historical rate (both descending), then date and match id
//! (ascending) so equal inputs always rank the same way.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::record::MatchRecord;
use super::{is_probability, ModelError};

pub const DEFAULT_LIMIT: usize = 3;

/// Confidence thresholds a match must exceed to become a pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingPolicy {
    pub min_historical_rate: f64,
    pub min_model_probability: f64,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        RankingPolicy {
            min_historical_rate: 0.80,
            min_model_probability: 0.85,
        }
    }
}

impl RankingPolicy {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !is_probability(self.min_historical_rate) {
            return Err(ModelError::InvalidConfiguration(format!(
                "min_historical_rate must be within [0, 1], got {}",
                self.min_historical_rate
            )));
        }
        if !is_probability(self.min_model_probability) {
            return Err(ModelError::InvalidConfiguration(format!(
                "min_model_probability must be within [0, 1], got {}",
                self.min_model_probability
            )));
        }
        Ok(())
    }

    fn qualifies(&self, record: &MatchRecord) -> bool {
        record
            .historical_rate()
            .is_some_and(|rate| rate > self.min_historical_rate)
            && record.model_probability > self.min_model_probability
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPick {
    /// 1-based position in the list.
    pub rank: usize,
    pub historical_rate: f64,
    #[serde(flatten)]
    pub record: MatchRecord,
}

/// Select and order the top `limit` picks from `records`.
///
/// Returns fewer than `limit` picks when fewer qualify, and an empty list for
/// empty input. A zero `limit` is a configuration error.
pub fn rank(
    records: &[MatchRecord],
    limit: usize,
    policy: &RankingPolicy,
) -> Result<Vec<RankedPick>, ModelError> {
    if limit == 0 {
        return Err(ModelError::InvalidConfiguration(
            "limit must be at least 1".into(),
        ));
    }
    policy.validate()?;

    let mut qualifying: Vec<(f64, &MatchRecord)> = records
        .iter()
        .filter(|r| policy.qualifies(r))
        .filter_map(|r| r.historical_rate().map(|rate| (rate, r)))
        .collect();

    qualifying.sort_by(|(rate_a, a), (rate_b, b)| compare_picks(*rate_a, a, *rate_b, b));

    Ok(qualifying
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (historical_rate, record))| RankedPick {
            rank: i + 1,
            historical_rate,
            record: record.clone(),
        })
        .collect())
}

fn compare_picks(rate_a: f64, a: &MatchRecord, rate_b: f64, b: &MatchRecord) -> Ordering {
    b.model_probability
        .total_cmp(&a.model_probability)
        .then_with(|| rate_b.total_cmp(&rate_a))
        .then_with(|| a.date.cmp(&b.date))
        .then_with(|| a.match_id.cmp(&b.match_id))
}
