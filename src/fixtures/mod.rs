pub mod football_data;
pub mod provider;
pub mod stats;

pub use football_data::FootballData;
pub use provider::FixtureSource;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::db::models::{FootballMatch, MatchStatus, PlayedMatch, TeamRecord};
use crate::db::Database;
use crate::model::{BlendWeights, FixtureRow, MatchRecord, ModelError, TeamStat};

/// Knobs of one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub competitions: Vec<String>,
    /// Fixtures further out than this many days are not scored.
    pub horizon_days: i64,
    pub form_window: usize,
    pub weights: BlendWeights,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub teams: usize,
    pub fixtures_scored: usize,
    pub fixtures_insufficient: usize,
    pub results: usize,
    /// Finished matches kept for team form listings
    pub played: usize,
}

/// Fetch every competition once, refresh team stats and the finished match
/// history, then store recent results and scored upcoming fixtures.
///
/// A competition whose requests fail is logged and skipped.
pub async fn run_scrape(
    source: &dyn FixtureSource,
    db: &Database,
    opts: &ScrapeOptions,
    now: DateTime<Utc>,
) -> Result<ScrapeSummary> {
    let mut finished: Vec<FootballMatch> = Vec::new();
    let mut scheduled: Vec<FootballMatch> = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();

    for comp in &opts.competitions {
        info!("Processing {} via {}", comp, source.name());
        for status in [MatchStatus::Finished, MatchStatus::Scheduled] {
            match source.fetch_matches(comp, status).await {
                Ok(matches) => {
                    for m in matches {
                        // cup and league feeds can overlap
                        if !seen.insert(m.id) {
                            continue;
                        }
                        match m.status {
                            MatchStatus::Finished => finished.push(m),
                            MatchStatus::Scheduled => scheduled.push(m),
                            _ => {}
                        }
                    }
                }
                Err(e) => warn!("Fetching {} {} matches failed: {}", comp, status.as_api_str(), e),
            }
        }
    }

    if finished.is_empty() && scheduled.is_empty() {
        warn!("No data fetched");
        return Ok(ScrapeSummary::default());
    }

    let team_stats = stats::aggregate(&finished, opts.form_window, now);
    for record in team_stats.values() {
        db.upsert_team_stats(record)?;
    }

    let mut summary = ScrapeSummary {
        teams: team_stats.len(),
        ..Default::default()
    };

    for played in finished.iter().filter_map(PlayedMatch::from_match) {
        db.upsert_played_match(&played)?;
        summary.played += 1;
    }

    let today = now.date_naive();
    let yesterday = today - Duration::days(1);
    let horizon = today + Duration::days(opts.horizon_days);

    for m in finished.iter().filter(|m| (yesterday..=today).contains(&m.date())) {
        let mut row = fixture_row(m, &team_stats);
        row.home_score = m.home_score;
        row.away_score = m.away_score;
        // keep the pre-match probability if this fixture was scored earlier
        row.model_prob = db.stored_probability(m.date(), &m.home_team, &m.away_team)?;
        db.upsert_prediction(&row)?;
        summary.results += 1;
    }

    for m in scheduled.iter().filter(|m| (today..=horizon).contains(&m.date())) {
        let mut row = fixture_row(m, &team_stats);
        let home = team_stat(&m.home_team, &team_stats);
        let away = team_stat(&m.away_team, &team_stats);
        match MatchRecord::score(m.id.to_string(), m.date(), home, away, &opts.weights) {
            Ok(record) => {
                row.model_prob = Some(record.model_probability);
                summary.fixtures_scored += 1;
            }
            Err(ModelError::DataInsufficient { team }) => {
                warn!(
                    "Not scoring {} vs {}: insufficient data for {}",
                    m.home_team, m.away_team, team
                );
                summary.fixtures_insufficient += 1;
            }
            Err(e) => return Err(e.into()),
        }
        db.upsert_prediction(&row)?;
    }

    info!(
        "Scraper finished: {} teams, {} fixtures scored, {} without data, {} results, {} played matches",
        summary.teams, summary.fixtures_scored, summary.fixtures_insufficient, summary.results, summary.played
    );
    Ok(summary)
}

fn team_stat(team: &str, stats: &HashMap<String, TeamRecord>) -> TeamStat {
    stats
        .get(team)
        .map(TeamRecord::stat)
        .unwrap_or_else(|| TeamStat::new(team, None))
}

fn fixture_row(m: &FootballMatch, stats: &HashMap<String, TeamRecord>) -> FixtureRow {
    let home = team_stat(&m.home_team, stats);
    let away = team_stat(&m.away_team, stats);
    FixtureRow {
        match_id: Some(m.id.to_string()),
        date: Some(m.date()),
        kickoff: Some(m.kickoff_time()),
        league: Some(m.competition.clone()),
        home_team: Some(home.team),
        away_team: Some(away.team),
        home_rate: home.over15_rate,
        away_rate: away.over15_rate,
        home_form: home.recent_form,
        away_form: away.recent_form,
        home_sample_size: home.sample_size,
        away_sample_size: away.sample_size,
        model_prob: None,
        home_score: None,
        away_score: None,
    }
}
