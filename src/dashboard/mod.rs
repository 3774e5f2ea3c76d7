use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::db::models::PlayedMatch;
use crate::db::Database;
use crate::model::{
    calculate, evaluate, outcome_probabilities, rank, BlendWeights, MatchRecord, Metrics,
    ModelError, Outcome, OutcomeProbabilities, RankedPick, RankingPolicy, TeamStat,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Settled rows considered by /api/calibration
const CALIBRATION_WINDOW: i64 = 500;

/// Matches listed by /api/teams/recent unless a limit is given
const RECENT_MATCHES: usize = 5;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub weights: BlendWeights,
    pub policy: RankingPolicy,
    pub top_n: usize,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/top-picks", get(top_picks_handler))
        .route("/api/results", get(results_handler))
        .route("/api/teams", get(teams_handler))
        .route("/api/teams/recent", get(recent_matches_handler))
        .route("/api/calculate", get(calculate_handler))
        .route("/api/calibration", get(calibration_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn model_error(e: ModelError) -> (StatusCode, String) {
    let status = match e {
        ModelError::DataInsufficient { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ModelError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
        // rows come from our own store
        ModelError::MalformedRecord { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

/// The dashboard's notion of "today" is the server's local calendar day.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn index_handler() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

#[derive(Debug, Deserialize, Default)]
pub struct DayQuery {
    pub date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TopPicksResponse {
    pub date: NaiveDate,
    pub picks: Vec<RankedPick>,
    /// Fixtures that could not be scored, as "Home vs Away"
    pub insufficient_data: Vec<String>,
}

/// GET /api/top-picks?date=YYYY-MM-DD&limit=N
async fn top_picks_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DayQuery>,
) -> ApiResult<TopPicksResponse> {
    let date = q.date.unwrap_or_else(today);
    let limit = q.limit.unwrap_or(state.top_n);
    let rows = state.db.list_predictions_on(date).map_err(internal)?;

    let mut records = Vec::with_capacity(rows.len());
    let mut insufficient_data = Vec::new();
    for row in &rows {
        // finished matches are shown under results, not as picks
        if row.home_score.is_some() && row.away_score.is_some() {
            continue;
        }
        match MatchRecord::from_row(row, &state.weights) {
            Ok(record) => records.push(record),
            Err(ModelError::DataInsufficient { team }) => {
                debug!("Skipping fixture without data for {}", team);
                insufficient_data.push(format!(
                    "{} vs {}",
                    row.home_team.as_deref().unwrap_or("?"),
                    row.away_team.as_deref().unwrap_or("?")
                ));
            }
            Err(e) => {
                warn!("Malformed stored row for {}: {}", date, e);
                return Err(model_error(e));
            }
        }
    }

    let picks = rank(&records, limit, &state.policy).map_err(model_error)?;
    Ok(Json(TopPicksResponse {
        date,
        picks,
        insufficient_data,
    }))
}

#[derive(Debug, Serialize)]
pub struct ResultEntry {
    pub match_id: Option<String>,
    pub league: Option<String>,
    pub kickoff: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub model_prob: Option<f64>,
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub date: NaiveDate,
    pub results: Vec<ResultEntry>,
    pub hits: usize,
    pub settled: usize,
}

/// GET /api/results?date=YYYY-MM-DD (defaults to yesterday)
async fn results_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DayQuery>,
) -> ApiResult<ResultsResponse> {
    let date = q.date.unwrap_or_else(|| today() - Duration::days(1));
    let rows = state.db.list_predictions_on(date).map_err(internal)?;

    let results: Vec<ResultEntry> = rows
        .into_iter()
        .map(|r| ResultEntry {
            outcome: Outcome::from_score(r.home_score, r.away_score),
            match_id: r.match_id,
            league: r.league,
            kickoff: r.kickoff,
            home_team: r.home_team,
            away_team: r.away_team,
            home_score: r.home_score,
            away_score: r.away_score,
            model_prob: r.model_prob,
        })
        .collect();
    let hits = results.iter().filter(|r| r.outcome == Outcome::Hit).count();
    let settled = results
        .iter()
        .filter(|r| r.outcome != Outcome::Pending)
        .count();

    Ok(Json(ResultsResponse {
        date,
        results,
        hits,
        settled,
    }))
}

/// GET /api/teams
async fn teams_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<String>> {
    state.db.list_teams().map(Json).map_err(internal)
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub team: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecentMatchesResponse {
    pub team: String,
    /// Stored over 1.5 rate across the latest matches, if known
    pub recent_form: Option<f64>,
    pub matches: Vec<PlayedMatch>,
}

/// GET /api/teams/recent?team=X&limit=N
async fn recent_matches_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RecentQuery>,
) -> ApiResult<RecentMatchesResponse> {
    let team = q.team.trim();
    if team.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "team is required".into()));
    }
    let limit = q.limit.unwrap_or(RECENT_MATCHES);
    if limit == 0 {
        return Err((StatusCode::BAD_REQUEST, "limit must be at least 1".into()));
    }

    let matches = state.db.recent_matches(team, limit).map_err(internal)?;
    let recent_form = state
        .db
        .get_team_stats(team)
        .map_err(internal)?
        .and_then(|t| t.recent_form);
    Ok(Json(RecentMatchesResponse {
        team: team.to_string(),
        recent_form,
        matches,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CalculateQuery {
    pub home: String,
    pub away: String,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub home: TeamStat,
    pub away: TeamStat,
    pub over15_probability: f64,
    /// Home/draw/away split, when both sides have goal averages
    pub outcomes: Option<OutcomeProbabilities>,
}

/// GET /api/calculate?home=A&away=B
async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CalculateQuery>,
) -> ApiResult<CalculateResponse> {
    let (home_name, away_name) = (q.home.trim(), q.away.trim());
    if home_name.is_empty() || away_name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "both teams are required".into()));
    }
    if home_name == away_name {
        return Err((
            StatusCode::BAD_REQUEST,
            "home and away team must differ".into(),
        ));
    }

    let home_record = state.db.get_team_stats(home_name).map_err(internal)?;
    let away_record = state.db.get_team_stats(away_name).map_err(internal)?;
    let home = home_record
        .as_ref()
        .map(|t| t.stat())
        .unwrap_or_else(|| TeamStat::new(home_name, None));
    let away = away_record
        .as_ref()
        .map(|t| t.stat())
        .unwrap_or_else(|| TeamStat::new(away_name, None));

    let over15_probability = calculate(&home, &away, &state.weights).map_err(model_error)?;

    let expected = home_record
        .as_ref()
        .and_then(|t| t.home_goals_avg)
        .zip(away_record.as_ref().and_then(|t| t.away_goals_avg));
    let outcomes = match expected {
        Some((h, a)) => Some(outcome_probabilities(h, a).map_err(model_error)?),
        None => None,
    };

    Ok(Json(CalculateResponse {
        home,
        away,
        over15_probability,
        outcomes,
    }))
}

/// GET /api/calibration
async fn calibration_handler(State(state): State<Arc<AppState>>) -> ApiResult<Option<Metrics>> {
    let rows = state
        .db
        .list_settled_predictions(CALIBRATION_WINDOW)
        .map_err(internal)?;
    let samples: Vec<(f64, Outcome)> = rows
        .iter()
        .filter_map(|r| Some((r.model_prob?, Outcome::from_score(r.home_score, r.away_score))))
        .collect();
    Ok(Json(evaluate(&samples)))
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Over 1.5 Goals Predictor</title>
<style>
  :root {
    --bg: #0e1117;
    --card: #161b22;
    --border: #30363d;
    --accent: #00ff41;
    --red: #ff4d4d;
    --text: #e0e0e0;
    --muted: #8b949e;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; color: var(--accent); }
  header p { color: var(--muted); font-size: .85rem; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  h2 { color: var(--accent); font-size: 1.1rem; margin-bottom: .8rem; }
  .picks { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }
  .card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1rem; }
  .card .top { display: flex; justify-content: space-between; color: var(--muted); font-size: .8rem; margin-bottom: .6rem; }
  .conf { color: var(--accent); border: 1px solid var(--accent); border-radius: 12px; padding: 0 .5rem; }
  .team { font-weight: 700; }
  .vs { color: var(--muted); text-align: center; margin: .2rem 0; }
  .row { background: var(--card); border-left: 5px solid var(--muted); border-radius: 8px; padding: .6rem 1rem; margin-bottom: .5rem; display: flex; justify-content: space-between; }
  .row.hit { border-left-color: var(--accent); }
  .row.miss { border-left-color: var(--red); }
  .empty { color: var(--muted); font-size: .9rem; }
  form { display: flex; gap: .6rem; flex-wrap: wrap; align-items: center; }
  select, button { background: var(--card); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .4rem .7rem; }
  button { background: var(--accent); color: var(--bg); font-weight: 700; border: none; cursor: pointer; }
  #calc-out { margin-top: .8rem; }
  .form-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 1rem; margin-top: 1rem; }
  .form-grid h3 { margin: 0 0 .6rem; font-size: 1rem; }
</style>
</head>
<body>
<header>
  <h1>Over 1.5 Goals Predictor</h1>
  <p>Daily top picks from historical over 1.5 rates</p>
</header>
<main>
  <section>
    <h2>Daily Top Picks</h2>
    <div class="picks" id="picks"><div class="empty">Loading…</div></div>
  </section>
  <section>
    <h2>Yesterday's Results</h2>
    <div id="results"><div class="empty">Loading…</div></div>
  </section>
  <section>
    <h2>Match Calculator</h2>
    <form id="calc" onsubmit="runCalc(event)">
      <select id="home"></select><span>vs</span><select id="away"></select>
      <button type="submit">Calculate</button>
    </form>
    <div id="calc-out"></div>
  </section>
</main>
<script>
const pct = v => (v*100).toFixed(1)+'%';

async function loadPicks() {
  const r = await fetch('/api/top-picks');
  const el = document.getElementById('picks');
  if (!r.ok) { el.innerHTML = `<div class="empty">${await r.text()}</div>`; return; }
  const d = await r.json();
  if (!d.picks.length) { el.innerHTML = `<div class="empty">No high-confidence picks for ${d.date}. Check back later!</div>`; return; }
  el.innerHTML = d.picks.map(p => `<div class="card">
    <div class="top"><span>${p.league || ''}</span><span class="conf">${Math.floor(p.model_probability*100)}% Conf.</span></div>
    <div class="team">${p.home.team}</div><div class="vs">vs</div><div class="team">${p.away.team}</div>
    <div class="top" style="margin-top:.8rem"><span>Over 1.5 Goals · ${p.date}</span><span>${p.kickoff || ''}</span></div>
  </div>`).join('');
}

async function loadResults() {
  const r = await fetch('/api/results');
  const el = document.getElementById('results');
  if (!r.ok) { el.innerHTML = `<div class="empty">${await r.text()}</div>`; return; }
  const d = await r.json();
  if (!d.results.length) { el.innerHTML = `<div class="empty">No results found for ${d.date}.</div>`; return; }
  const icon = { hit: '✅', miss: '❌', pending: '⏳' };
  el.innerHTML = d.results.map(x => `<div class="row ${x.outcome}">
    <span>${x.home_team} <b>${x.home_score ?? '-'} - ${x.away_score ?? '-'}</b> ${x.away_team}</span>
    <span>${icon[x.outcome]} Over 1.5</span>
  </div>`).join('') + `<div class="empty">${d.hits}/${d.settled} settled matches went over 1.5</div>`;
}

async function loadTeams() {
  const r = await fetch('/api/teams');
  if (!r.ok) return;
  const teams = await r.json();
  const opts = teams.map(t => `<option>${t}</option>`).join('');
  document.getElementById('home').innerHTML = opts;
  document.getElementById('away').innerHTML = opts;
  if (teams.length > 1) document.getElementById('away').selectedIndex = 1;
}

async function runCalc(ev) {
  ev.preventDefault();
  const home = document.getElementById('home').value;
  const away = document.getElementById('away').value;
  const out = document.getElementById('calc-out');
  const r = await fetch(`/api/calculate?home=${encodeURIComponent(home)}&away=${encodeURIComponent(away)}`);
  if (!r.ok) { out.innerHTML = `<div class="empty">${await r.text()}</div>`; return; }
  const d = await r.json();
  let html = `<div class="card"><div class="team">Over 1.5 Goals: ${pct(d.over15_probability)}</div>`;
  if (d.outcomes) {
    html += `<div class="top" style="margin-top:.6rem"><span>${home} win ${pct(d.outcomes.home_win)}</span><span>Draw ${pct(d.outcomes.draw)}</span><span>${away} win ${pct(d.outcomes.away_win)}</span></div>`;
  }
  out.innerHTML = html + '</div>';
  const forms = await Promise.all([home, away].map(loadRecent));
  out.innerHTML += `<div class="form-grid">${forms.join('')}</div>`;
}

async function loadRecent(team) {
  const r = await fetch(`/api/teams/recent?team=${encodeURIComponent(team)}&limit=5`);
  if (!r.ok) return `<div class="empty">${await r.text()}</div>`;
  const d = await r.json();
  const head = `<h3>📊 ${d.team} recent form${d.recent_form == null ? '' : ' · ' + pct(d.recent_form)}</h3>`;
  if (!d.matches.length) return `<div class="card">${head}<div class="empty">No finished matches stored.</div></div>`;
  const rows = d.matches.map(m => `<div class="row ${m.home_score + m.away_score >= 2 ? 'hit' : 'miss'}">
    <span>${m.date}</span>
    <span>${m.home_team} <b>${m.home_score} - ${m.away_score}</b> ${m.away_team}</span>
  </div>`).join('');
  return `<div class="card">${head}${rows}</div>`;
}

loadPicks();
loadResults();
loadTeams();
</script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::TeamRecord;
    use crate::model::FixtureRow;
    use chrono::{TimeZone, Utc};

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            db: Database::open_in_memory().unwrap(),
            weights: BlendWeights::rates_only(),
            policy: RankingPolicy::default(),
            top_n: 3,
        })
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn fixture(id: &str, home: &str, away: &str, rates: (Option<f64>, Option<f64>), prob: Option<f64>) -> FixtureRow {
        FixtureRow {
            match_id: Some(id.into()),
            date: Some(day(13)),
            kickoff: Some("15:00".into()),
            league: Some("Bundesliga".into()),
            home_team: Some(home.into()),
            away_team: Some(away.into()),
            home_rate: rates.0,
            away_rate: rates.1,
            model_prob: prob,
            ..Default::default()
        }
    }

    fn team(name: &str, rate: Option<f64>, goals: (Option<f64>, Option<f64>)) -> TeamRecord {
        TeamRecord {
            team: name.into(),
            over15_rate: rate,
            sample_size: 10,
            recent_form: None,
            home_goals_avg: goals.0,
            away_goals_avg: goals.1,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn top_picks_rank_stored_rows() {
        let st = state();
        st.db.upsert_prediction(&fixture("1", "A", "B", (Some(0.9), Some(0.88)), Some(0.89))).unwrap();
        st.db.upsert_prediction(&fixture("2", "C", "D", (Some(0.95), Some(0.95)), Some(0.95))).unwrap();
        st.db.upsert_prediction(&fixture("3", "E", "F", (Some(0.80), Some(0.99)), Some(0.90))).unwrap();
        st.db.upsert_prediction(&fixture("4", "G", "H", (Some(0.9), None), None)).unwrap();

        let Json(resp) = top_picks_handler(
            State(st),
            Query(DayQuery {
                date: Some(day(13)),
                limit: None,
            }),
        )
        .await
        .unwrap();

        let ids: Vec<_> = resp.picks.iter().map(|p| p.record.match_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(resp.insufficient_data, vec!["G vs H"]);
    }

    #[tokio::test]
    async fn zero_limit_is_bad_request() {
        let (status, _) = top_picks_handler(
            State(state()),
            Query(DayQuery {
                date: Some(day(13)),
                limit: Some(0),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn results_report_outcomes() {
        let st = state();
        let mut hit = fixture("1", "A", "B", (Some(0.9), Some(0.9)), Some(0.9));
        hit.home_score = Some(1);
        hit.away_score = Some(1);
        let mut miss = fixture("2", "C", "D", (Some(0.9), Some(0.9)), Some(0.9));
        miss.home_score = Some(1);
        miss.away_score = Some(0);
        st.db.upsert_prediction(&hit).unwrap();
        st.db.upsert_prediction(&miss).unwrap();
        st.db.upsert_prediction(&fixture("3", "E", "F", (None, None), None)).unwrap();

        let Json(resp) = results_handler(
            State(st.clone()),
            Query(DayQuery {
                date: Some(day(13)),
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.hits, 1);
        assert_eq!(resp.settled, 2);
        assert_eq!(resp.results.len(), 3);

        let Json(metrics) = calibration_handler(State(st)).await.unwrap();
        let metrics = metrics.unwrap();
        assert_eq!(metrics.samples, 2);
        assert!((metrics.hit_rate - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn calculator_uses_stored_team_stats() {
        let st = state();
        st.db.upsert_team_stats(&team("A", Some(0.9), (Some(1.9), Some(1.2)))).unwrap();
        st.db.upsert_team_stats(&team("B", Some(0.88), (Some(1.4), Some(0.8)))).unwrap();

        let Json(resp) = calculate_handler(
            State(st.clone()),
            Query(CalculateQuery {
                home: "A".into(),
                away: "B".into(),
            }),
        )
        .await
        .unwrap();
        let expected = calculate(&resp.home, &resp.away, &st.weights).unwrap();
        assert_eq!(resp.over15_probability.to_bits(), expected.to_bits());
        assert!((resp.over15_probability - 0.89).abs() < 1e-12);
        let outcomes = resp.outcomes.unwrap();
        assert!(outcomes.home_win > outcomes.away_win);
    }

    #[tokio::test]
    async fn calculator_rejects_unknown_and_identical_teams() {
        let st = state();
        st.db.upsert_team_stats(&team("A", Some(0.9), (None, None))).unwrap();

        let (status, _) = calculate_handler(
            State(st.clone()),
            Query(CalculateQuery {
                home: "A".into(),
                away: "Unknown".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = calculate_handler(
            State(st),
            Query(CalculateQuery {
                home: "A".into(),
                away: "A".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    fn played(id: i64, d: u32, home: &str, away: &str, score: (i32, i32)) -> PlayedMatch {
        let kickoff = Utc.with_ymd_and_hms(2026, 1, d, 20, 0, 0).unwrap();
        PlayedMatch {
            match_id: id,
            competition: "BL1".into(),
            date: kickoff.date_naive(),
            kickoff,
            home_team: home.into(),
            away_team: away.into(),
            home_score: score.0,
            away_score: score.1,
        }
    }

    #[tokio::test]
    async fn recent_matches_list_latest_first() {
        let st = state();
        let mut a = team("A", Some(0.8), (None, None));
        a.recent_form = Some(0.6);
        st.db.upsert_team_stats(&a).unwrap();
        for (i, d) in (1..=7).enumerate() {
            let (home, away) = if i % 2 == 0 { ("A", "B") } else { ("C", "A") };
            st.db
                .upsert_played_match(&played(i as i64 + 1, d, home, away, (1, i as i32)))
                .unwrap();
        }
        st.db.upsert_played_match(&played(99, 8, "B", "C", (4, 4))).unwrap();

        let Json(resp) = recent_matches_handler(
            State(st.clone()),
            Query(RecentQuery {
                team: " A ".into(),
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.team, "A");
        assert_eq!(resp.recent_form, Some(0.6));
        let ids: Vec<i64> = resp.matches.iter().map(|m| m.match_id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);

        let Json(resp) = recent_matches_handler(
            State(st.clone()),
            Query(RecentQuery {
                team: "Unknown".into(),
                limit: Some(3),
            }),
        )
        .await
        .unwrap();
        assert!(resp.matches.is_empty());
        assert_eq!(resp.recent_form, None);

        let (status, _) = recent_matches_handler(
            State(st),
            Query(RecentQuery {
                team: "A".into(),
                limit: Some(0),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn default_dates_follow_the_local_calendar() {
        let st = state();
        let Json(picks) = top_picks_handler(State(st.clone()), Query(DayQuery::default()))
            .await
            .unwrap();
        let Json(results) = results_handler(State(st), Query(DayQuery::default()))
            .await
            .unwrap();
        let local_today = Local::now().date_naive();
        // a run straddling local midnight may see the next day
        assert!(picks.date == local_today || picks.date + Duration::days(1) == local_today);
        assert_eq!(results.date + Duration::days(1), picks.date);
    }
}
