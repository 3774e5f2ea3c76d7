use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::probability::{estimate, BlendWeights, TeamStat};
use super::{is_probability, ModelError};

/// A raw row as handed over by the store, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureRow {
    pub match_id: Option<String>,
    pub date: Option<NaiveDate>,
    /// Kickoff time, "HH:MM" UTC.
    pub kickoff: Option<String>,
    pub league: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_rate: Option<f64>,
    pub away_rate: Option<f64>,
    pub home_form: Option<f64>,
    pub away_form: Option<f64>,
    pub home_sample_size: u32,
    pub away_sample_size: u32,
    pub model_prob: Option<f64>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

/// A scored fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub date: NaiveDate,
    pub kickoff: Option<String>,
    pub league: Option<String>,
    pub home: TeamStat,
    pub away: TeamStat,
    pub model_probability: f64,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

impl MatchRecord {
    /// Score a fixture with the probability model.
    pub fn score(
        match_id: impl Into<String>,
        date: NaiveDate,
        home: TeamStat,
        away: TeamStat,
        weights: &BlendWeights,
    ) -> Result<Self, ModelError> {
        let model_probability = estimate(&home, &away, weights)?;
        Ok(MatchRecord {
            match_id: match_id.into(),
            date,
            kickoff: None,
            league: None,
            home,
            away,
            model_probability,
            home_score: None,
            away_score: None,
        })
    }

    /// The match's historical over 1.5 rate: the weaker of the two teams.
    /// `None` if either team has no rate.
    pub fn historical_rate(&self) -> Option<f64> {
        match (self.home.over15_rate, self.away.over15_rate) {
            (Some(h), Some(a)) => Some(h.min(a)),
            _ => None,
        }
    }

    /// Validate a stored row. A row without a stored probability is scored
    /// on the spot, so a team lacking history surfaces as `DataInsufficient`.
    pub fn from_row(row: &FixtureRow, weights: &BlendWeights) -> Result<Self, ModelError> {
        let match_id = required_text("match_id", row.match_id.as_deref())?;
        let date = row
            .date
            .ok_or_else(|| ModelError::malformed("date", "is missing"))?;
        let home_team = required_text("home_team", row.home_team.as_deref())?;
        let away_team = required_text("away_team", row.away_team.as_deref())?;

        optional_probability("home_rate", row.home_rate)?;
        optional_probability("away_rate", row.away_rate)?;
        optional_probability("home_form", row.home_form)?;
        optional_probability("away_form", row.away_form)?;
        optional_probability("model_prob", row.model_prob)?;

        let home = TeamStat {
            team: home_team,
            over15_rate: row.home_rate,
            sample_size: row.home_sample_size,
            recent_form: row.home_form,
        };
        let away = TeamStat {
            team: away_team,
            over15_rate: row.away_rate,
            sample_size: row.away_sample_size,
            recent_form: row.away_form,
        };

        let model_probability = match row.model_prob {
            Some(p) => p,
            None => estimate(&home, &away, weights)?,
        };

        Ok(MatchRecord {
            match_id,
            date,
            kickoff: row.kickoff.clone(),
            league: row.league.clone(),
            home,
            away,
            model_probability,
            home_score: row.home_score,
            away_score: row.away_score,
        })
    }
}

fn required_text(field: &'static str, value: Option<&str>) -> Result<String, ModelError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        Some(_) => Err(ModelError::malformed(field, "is blank")),
        None => Err(ModelError::malformed(field, "is missing")),
    }
}

fn optional_probability(field: &'static str, value: Option<f64>) -> Result<(), ModelError> {
    match value {
        Some(v) if !is_probability(v) => Err(ModelError::malformed(
            field,
            format!("must be within [0, 1], got {v}"),
        )),
        _ => Ok(()),
    }
}
