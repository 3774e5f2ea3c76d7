use anyhow::Result;
use async_trait::async_trait;

use crate::db::models::{FootballMatch, MatchStatus};

/// Trait that every fixture/result feed must implement.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// All matches of a competition in the given status.
    async fn fetch_matches(&self, competition: &str, status: MatchStatus) -> Result<Vec<FootballMatch>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
