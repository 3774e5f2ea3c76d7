use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

pub mod models;
use models::*;

use crate::model::FixtureRow;

/// Thread-safe SQLite handle (single connection with mutex)
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the SQLite database at the given path
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("opening database {path}"))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Database {
            conn: Arc::new(Mutex::new(Connection::open_in_memory()?)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("database mutex poisoned"))
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // ── Team stats ────────────────────────────────────────────────────────────

    /// Insert or replace the aggregated stats of a team
    pub fn upsert_team_stats(&self, t: &TeamRecord) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO team_stats (team, over15_rate, sample_size, recent_form,
                                     home_goals_avg, away_goals_avg, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7)
             ON CONFLICT(team) DO UPDATE SET
                over15_rate=excluded.over15_rate,
                sample_size=excluded.sample_size,
                recent_form=excluded.recent_form,
                home_goals_avg=excluded.home_goals_avg,
                away_goals_avg=excluded.away_goals_avg,
                updated_at=excluded.updated_at",
            params![
                t.team,
                t.over15_rate,
                t.sample_size,
                t.recent_form,
                t.home_goals_avg,
                t.away_goals_avg,
                t.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_team_stats(&self, team: &str) -> Result<Option<TeamRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT team, over15_rate, sample_size, recent_form,
                        home_goals_avg, away_goals_avg, updated_at
                 FROM team_stats WHERE team=?1",
                params![team],
                map_team,
            )
            .optional()?;
        Ok(record)
    }

    /// Team names in alphabetical order
    pub fn list_teams(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT team FROM team_stats ORDER BY team ASC")?;
        let teams = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(teams)
    }

    // ── Predictions ───────────────────────────────────────────────────────────

    /// Insert a fixture row, superseding any earlier row for the same
    /// (date, home team, away team)
    pub fn upsert_prediction(&self, row: &FixtureRow) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO predictions (
                match_id, match_date, kickoff, league, home_team, away_team,
                home_rate, away_rate, home_form, away_form,
                home_sample_size, away_sample_size, model_prob,
                home_score, away_score, scraped_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)
             ON CONFLICT(match_date, home_team, away_team) DO UPDATE SET
                match_id=excluded.match_id,
                kickoff=excluded.kickoff,
                league=excluded.league,
                home_rate=excluded.home_rate,
                away_rate=excluded.away_rate,
                home_form=excluded.home_form,
                away_form=excluded.away_form,
                home_sample_size=excluded.home_sample_size,
                away_sample_size=excluded.away_sample_size,
                model_prob=excluded.model_prob,
                home_score=excluded.home_score,
                away_score=excluded.away_score,
                scraped_at=excluded.scraped_at",
            params![
                row.match_id,
                row.date,
                row.kickoff,
                row.league,
                row.home_team,
                row.away_team,
                row.home_rate,
                row.away_rate,
                row.home_form,
                row.away_form,
                row.home_sample_size,
                row.away_sample_size,
                row.model_prob,
                row.home_score,
                row.away_score,
                Utc::now(),
            ],
        )?;
        Ok(())
    }

    /// Rows for one match date, in kickoff order
    pub fn list_predictions_on(&self, date: NaiveDate) -> Result<Vec<FixtureRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{PREDICTION_COLUMNS} WHERE match_date=?1 ORDER BY kickoff ASC, id ASC"
        ))?;
        let rows = stmt
            .query_map(params![date], map_fixture)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Scored rows with a final score, newest first
    pub fn list_settled_predictions(&self, limit: i64) -> Result<Vec<FixtureRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{PREDICTION_COLUMNS}
             WHERE model_prob IS NOT NULL AND home_score IS NOT NULL AND away_score IS NOT NULL
             ORDER BY match_date DESC, id DESC LIMIT ?1"
        ))?;
        let rows = stmt
            .query_map(params![limit], map_fixture)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Model probability already stored for a fixture, if any
    pub fn stored_probability(
        &self,
        date: NaiveDate,
        home_team: &str,
        away_team: &str,
    ) -> Result<Option<f64>> {
        let conn = self.conn()?;
        let prob: Option<Option<f64>> = conn
            .query_row(
                "SELECT model_prob FROM predictions
                 WHERE match_date=?1 AND home_team=?2 AND away_team=?3",
                params![date, home_team, away_team],
                |row| row.get(0),
            )
            .optional()?;
        Ok(prob.flatten())
    }

    // ── Played matches ────────────────────────────────────────────────────────

    /// Insert or refresh a finished match
    pub fn upsert_played_match(&self, m: &PlayedMatch) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO played_matches (match_id, competition, match_date, kickoff,
                                         home_team, away_team, home_score, away_score)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)
             ON CONFLICT(match_id) DO UPDATE SET
                competition=excluded.competition,
                match_date=excluded.match_date,
                kickoff=excluded.kickoff,
                home_team=excluded.home_team,
                away_team=excluded.away_team,
                home_score=excluded.home_score,
                away_score=excluded.away_score",
            params![
                m.match_id,
                m.competition,
                m.date,
                m.kickoff,
                m.home_team,
                m.away_team,
                m.home_score,
                m.away_score,
            ],
        )?;
        Ok(())
    }

    /// A team's latest finished matches, home or away, newest first
    pub fn recent_matches(&self, team: &str, limit: usize) -> Result<Vec<PlayedMatch>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT match_id, competition, match_date, kickoff,
                    home_team, away_team, home_score, away_score
             FROM played_matches
             WHERE home_team=?1 OR away_team=?1
             ORDER BY kickoff DESC, match_id DESC
             LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![team, limit], map_played)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

const PREDICTION_COLUMNS: &str = "SELECT match_id, match_date, kickoff, league, home_team, away_team,
        home_rate, away_rate, home_form, away_form,
        home_sample_size, away_sample_size, model_prob,
        home_score, away_score
 FROM predictions";

fn map_team(row: &rusqlite::Row) -> rusqlite::Result<TeamRecord> {
    Ok(TeamRecord {
        team: row.get(0)?,
        over15_rate: row.get(1)?,
        sample_size: row.get(2)?,
        recent_form: row.get(3)?,
        home_goals_avg: row.get(4)?,
        away_goals_avg: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn map_played(row: &rusqlite::Row) -> rusqlite::Result<PlayedMatch> {
    Ok(PlayedMatch {
        match_id: row.get(0)?,
        competition: row.get(1)?,
        date: row.get(2)?,
        kickoff: row.get(3)?,
        home_team: row.get(4)?,
        away_team: row.get(5)?,
        home_score: row.get(6)?,
        away_score: row.get(7)?,
    })
}

fn map_fixture(row: &rusqlite::Row) -> rusqlite::Result<FixtureRow> {
    Ok(FixtureRow {
        match_id: row.get(0)?,
        date: row.get(1)?,
        kickoff: row.get(2)?,
        league: row.get(3)?,
        home_team: row.get(4)?,
        away_team: row.get(5)?,
        home_rate: row.get(6)?,
        away_rate: row.get(7)?,
        home_form: row.get(8)?,
        away_form: row.get(9)?,
        home_sample_size: row.get(10)?,
        away_sample_size: row.get(11)?,
        model_prob: row.get(12)?,
        home_score: row.get(13)?,
        away_score: row.get(14)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS)
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS team_stats (
    team            TEXT    PRIMARY KEY,
    over15_rate     REAL,
    sample_size     INTEGER NOT NULL DEFAULT 0,
    recent_form     REAL,
    home_goals_avg  REAL,
    away_goals_avg  REAL,
    updated_at      TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS predictions (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    match_id          TEXT,
    match_date        TEXT,
    kickoff           TEXT,
    league            TEXT,
    home_team         TEXT,
    away_team         TEXT,
    home_rate         REAL,
    away_rate         REAL,
    home_form         REAL,
    away_form         REAL,
    home_sample_size  INTEGER NOT NULL DEFAULT 0,
    away_sample_size  INTEGER NOT NULL DEFAULT 0,
    model_prob        REAL,
    home_score        INTEGER,
    away_score        INTEGER,
    scraped_at        TEXT    NOT NULL,
    UNIQUE (match_date, home_team, away_team)
);

CREATE INDEX IF NOT EXISTS idx_predictions_date ON predictions(match_date);

CREATE TABLE IF NOT EXISTS played_matches (
    match_id     INTEGER PRIMARY KEY,
    competition  TEXT    NOT NULL,
    match_date   TEXT    NOT NULL,
    kickoff      TEXT    NOT NULL,
    home_team    TEXT    NOT NULL,
    away_team    TEXT    NOT NULL,
    home_score   INTEGER NOT NULL,
    away_score   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_played_home ON played_matches(home_team);
CREATE INDEX IF NOT EXISTS idx_played_away ON played_matches(away_team);
"#;
