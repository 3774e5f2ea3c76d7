use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::TeamStat;

/// Aggregated history for one team, as written by the scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: String,
    /// Over 1.5 rate across finished matches (0.0–1.0); `None` without history
    pub over15_rate: Option<f64>,
    pub sample_size: u32,
    /// Over 1.5 rate across the most recent finished matches
    pub recent_form: Option<f64>,
    /// Mean goals scored in home matches
    pub home_goals_avg: Option<f64>,
    /// Mean goals scored in away matches
    pub away_goals_avg: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl TeamRecord {
    pub fn stat(&self) -> TeamStat {
        TeamStat {
            team: self.team.clone(),
            over15_rate: self.over15_rate,
            sample_size: self.sample_size,
            recent_form: self.recent_form,
        }
    }
}

/// A match as returned by the football-data.org API
#[derive(Debug, Clone, PartialEq)]
pub struct FootballMatch {
    pub id: i64,
    pub competition: String,
    pub kickoff: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

impl FootballMatch {
    pub fn date(&self) -> NaiveDate {
        self.kickoff.date_naive()
    }

    /// Kickoff as "HH:MM" UTC
    pub fn kickoff_time(&self) -> String {
        self.kickoff.format("%H:%M").to_string()
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    pub fn total_goals(&self) -> Option<i32> {
        Some(self.home_score? + self.away_score?)
    }
}

/// A finished match with its final score, kept for team form listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMatch {
    pub match_id: i64,
    pub competition: String,
    pub date: NaiveDate,
    pub kickoff: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
}

impl PlayedMatch {
    /// `None` unless both scores are known
    pub fn from_match(m: &FootballMatch) -> Option<Self> {
        Some(PlayedMatch {
            match_id: m.id,
            competition: m.competition.clone(),
            date: m.date(),
            kickoff: m.kickoff,
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            home_score: m.home_score?,
            away_score: m.away_score?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    InPlay,
    Finished,
    Postponed,
}

impl MatchStatus {
    /// Query-string value understood by the API
    pub fn as_api_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::InPlay => "IN_PLAY",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Postponed => "POSTPONED",
        }
    }
}
