//! Per-team over 1.5 history from finished matches.

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

use crate::db::models::{FootballMatch, TeamRecord};

/// Build a [`TeamRecord`] for every team appearing in `finished`.
///
/// Only matches with a known final score count. A team whose matches all
/// lack scores gets `None` rates rather than a made-up default.
pub fn aggregate(
    finished: &[FootballMatch],
    form_window: usize,
    now: DateTime<Utc>,
) -> HashMap<String, TeamRecord> {
    let teams: BTreeSet<&str> = finished
        .iter()
        .flat_map(|m| [m.home_team.as_str(), m.away_team.as_str()])
        .collect();

    teams
        .into_iter()
        .map(|team| (team.to_string(), team_record(finished, team, form_window, now)))
        .collect()
}

pub fn team_record(
    finished: &[FootballMatch],
    team: &str,
    form_window: usize,
    now: DateTime<Utc>,
) -> TeamRecord {
    let mut played: Vec<&FootballMatch> = finished
        .iter()
        .filter(|m| m.involves(team) && m.total_goals().is_some())
        .collect();
    played.sort_by_key(|m| m.kickoff);

    let recent_start = played.len().saturating_sub(form_window);
    let home_goals: Vec<i32> = played
        .iter()
        .filter(|m| m.home_team == team)
        .filter_map(|m| m.home_score)
        .collect();
    let away_goals: Vec<i32> = played
        .iter()
        .filter(|m| m.away_team == team)
        .filter_map(|m| m.away_score)
        .collect();

    TeamRecord {
        team: team.to_string(),
        over15_rate: over15_rate(&played),
        sample_size: played.len() as u32,
        recent_form: if form_window == 0 {
            None
        } else {
            over15_rate(&played[recent_start..])
        },
        home_goals_avg: mean(&home_goals),
        away_goals_avg: mean(&away_goals),
        updated_at: now,
    }
}

fn over15_rate(matches: &[&FootballMatch]) -> Option<f64> {
    if matches.is_empty() {
        return None;
    }
    let hits = matches
        .iter()
        .filter(|m| m.total_goals().is_some_and(|g| g >= 2))
        .count();
    Some(hits as f64 / matches.len() as f64)
}

fn mean(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::MatchStatus;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn played(id: i64, day: u32, home: &str, away: &str, score: Option<(i32, i32)>) -> FootballMatch {
        FootballMatch {
            id,
            competition: "Premier League".into(),
            kickoff: Utc.with_ymd_and_hms(2025, 12, day, 15, 0, 0).unwrap(),
            status: MatchStatus::Finished,
            home_team: home.into(),
            away_team: away.into(),
            home_score: score.map(|s| s.0),
            away_score: score.map(|s| s.1),
        }
    }

    fn history() -> Vec<FootballMatch> {
        vec![
            played(1, 1, "Arsenal", "Chelsea", Some((2, 0))),
            played(2, 8, "Chelsea", "Arsenal", Some((0, 0))),
            played(3, 15, "Arsenal", "Leeds", Some((1, 1))),
            played(4, 22, "Leeds", "Arsenal", Some((1, 0))),
            played(5, 29, "Arsenal", "Everton", None),
        ]
    }

    #[test]
    fn rate_counts_scored_matches_only() {
        let rec = team_record(&history(), "Arsenal", 5, Utc::now());
        assert_eq!(rec.sample_size, 4);
        assert_relative_eq!(rec.over15_rate.unwrap(), 0.5, epsilon = 1e-12);
        // home: 2 and 1 goals; away: 0 and 0
        assert_relative_eq!(rec.home_goals_avg.unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(rec.away_goals_avg.unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn form_uses_latest_matches() {
        let rec = team_record(&history(), "Arsenal", 2, Utc::now());
        // last two scored: 1-1 (hit), 1-0 (miss)
        assert_relative_eq!(rec.recent_form.unwrap(), 0.5, epsilon = 1e-12);

        let rec = team_record(&history(), "Arsenal", 1, Utc::now());
        assert_relative_eq!(rec.recent_form.unwrap(), 0.0, epsilon = 1e-12);

        let rec = team_record(&history(), "Arsenal", 0, Utc::now());
        assert_eq!(rec.recent_form, None);
    }

    #[test]
    fn team_without_scores_has_no_rate() {
        let rec = team_record(&history(), "Everton", 5, Utc::now());
        assert_eq!(rec.sample_size, 0);
        assert_eq!(rec.over15_rate, None);
        assert_eq!(rec.recent_form, None);
        assert_eq!(rec.away_goals_avg, None);
    }

    #[test]
    fn aggregate_covers_every_team() {
        let all = aggregate(&history(), 5, Utc::now());
        let mut names: Vec<_> = all.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["Arsenal", "Chelsea", "Everton", "Leeds"]);
        assert_relative_eq!(all["Leeds"].over15_rate.unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(all["Chelsea"].over15_rate.unwrap(), 0.5, epsilon = 1e-12);
    }
}
