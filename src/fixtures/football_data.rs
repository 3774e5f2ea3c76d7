use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::provider::FixtureSource;
use crate::db::models::{FootballMatch, MatchStatus};

const MAX_ATTEMPTS: usize = 3;

/// Fixture source backed by the football-data.org v4 API.
/// Docs: <https://www.football-data.org/documentation/quickstart>
pub struct FootballData {
    http: Client,
    api_token: String,
    base_url: Url,
    /// How long to back off after an HTTP 429
    rate_limit_wait: Duration,
}

impl FootballData {
    pub fn new(api_token: &str, base_url: &str, rate_limit_wait: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        let mut base_url = Url::parse(base_url).context("Invalid football-data base URL")?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(FootballData {
            http,
            api_token: api_token.to_string(),
            base_url,
            rate_limit_wait,
        })
    }

    fn matches_url(&self, competition: &str, status: MatchStatus) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("competitions/{competition}/matches"))
            .context("Failed to build matches URL")?;
        url.query_pairs_mut().append_pair("status", status.as_api_str());
        Ok(url)
    }

    async fn get_json(&self, url: &Url) -> Result<serde_json::Value> {
        for attempt in 1..=MAX_ATTEMPTS {
            let resp = self
                .http
                .get(url.clone())
                .header("X-Auth-Token", &self.api_token)
                .send()
                .await
                .context("football-data request failed")?;

            match resp.status() {
                s if s.is_success() => {
                    return resp
                        .json()
                        .await
                        .context("Failed to parse football-data response");
                }
                s if s == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_ATTEMPTS => {
                    warn!(
                        "Rate limit reached (attempt {}/{}), waiting {:?}",
                        attempt, MAX_ATTEMPTS, self.rate_limit_wait
                    );
                    tokio::time::sleep(self.rate_limit_wait).await;
                }
                status => {
                    let body = resp.text().await.unwrap_or_default();
                    anyhow::bail!("football-data error {}: {}", status, body);
                }
            }
        }
        anyhow::bail!("football-data rate limit persisted after {} attempts", MAX_ATTEMPTS)
    }
}

#[async_trait]
impl FixtureSource for FootballData {
    fn name(&self) -> &str {
        "football-data.org"
    }

    async fn fetch_matches(&self, competition: &str, status: MatchStatus) -> Result<Vec<FootballMatch>> {
        let url = self.matches_url(competition, status)?;
        debug!("Fetching matches from {}", url);
        let raw = self.get_json(&url).await?;
        Ok(parse_matches_response(&raw, competition))
    }
}

fn status_from_str(s: &str) -> MatchStatus {
    match s {
        "FINISHED" | "AWARDED" => MatchStatus::Finished,
        "IN_PLAY" | "PAUSED" | "LIVE" => MatchStatus::InPlay,
        "POSTPONED" | "SUSPENDED" | "CANCELLED" => MatchStatus::Postponed,
        _ => MatchStatus::Scheduled,
    }
}

/// Matches missing an id, kickoff, or team name are skipped.
fn parse_matches_response(raw: &serde_json::Value, competition: &str) -> Vec<FootballMatch> {
    let matches = match raw["matches"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    matches
        .iter()
        .filter_map(|m| {
            let id = m["id"].as_i64()?;
            let kickoff = m["utcDate"]
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
                .with_timezone(&Utc);
            let home_team = m["homeTeam"]["name"].as_str()?.to_string();
            let away_team = m["awayTeam"]["name"].as_str()?.to_string();
            let competition = m["competition"]["name"]
                .as_str()
                .unwrap_or(competition)
                .to_string();
            let status = status_from_str(m["status"].as_str().unwrap_or("SCHEDULED"));
            let full_time = &m["score"]["fullTime"];

            Some(FootballMatch {
                id,
                competition,
                kickoff,
                status,
                home_team,
                away_team,
                home_score: full_time["home"].as_i64().map(|v| v as i32),
                away_score: full_time["away"].as_i64().map(|v| v as i32),
            })
        })
        .collect()
}
