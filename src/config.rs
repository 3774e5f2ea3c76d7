use clap::{Parser, Subcommand};

use crate::model::{BlendWeights, RankingPolicy, DEFAULT_LIMIT};

/// Over 1.5 goals predictor: scraper and dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "over15-predictor", version, about)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "predictions.db", global = true)]
    pub database_path: String,

    /// Weight of the home team's signal in the blend (0.0–1.0)
    #[arg(long, env = "HOME_WEIGHT", default_value = "0.5", global = true)]
    pub home_weight: f64,

    /// Weight of the away team's signal in the blend (0.0–1.0)
    #[arg(long, env = "AWAY_WEIGHT", default_value = "0.5", global = true)]
    pub away_weight: f64,

    /// Pull of recent form on each team's long-run rate (0.0–1.0)
    #[arg(long, env = "FORM_WEIGHT", default_value = "0.2", global = true)]
    pub form_weight: f64,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch results and fixtures once and store scored predictions
    Scrape(ScrapeArgs),
    /// Serve the dashboard
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// football-data.org API token
    #[arg(long, env = "FOOTBALL_DATA_API_TOKEN")]
    pub api_token: Option<String>,

    /// football-data.org API base URL
    #[arg(
        long,
        env = "FOOTBALL_DATA_API_URL",
        default_value = "https://api.football-data.org/v4/"
    )]
    pub api_url: String,

    /// Competition codes to scrape
    #[arg(
        long,
        env = "COMPETITIONS",
        value_delimiter = ',',
        default_value = "PL,BL1,PD,SA,FL1,CL"
    )]
    pub competitions: Vec<String>,

    /// Only fixtures within this many days are scored
    #[arg(long, env = "HORIZON_DAYS", default_value = "3")]
    pub horizon_days: i64,

    /// Number of latest matches that make up a team's recent form
    #[arg(long, env = "FORM_WINDOW", default_value = "5")]
    pub form_window: usize,

    /// Seconds to wait after an HTTP 429 before retrying
    #[arg(long, env = "RATE_LIMIT_WAIT_SECS", default_value = "60")]
    pub rate_limit_wait_secs: u64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Picks shown per day
    #[arg(long, env = "TOP_N", default_value_t = DEFAULT_LIMIT)]
    pub top_n: usize,

    /// A pick's weaker team must have a historical rate above this
    #[arg(long, env = "MIN_HISTORICAL_RATE", default_value = "0.80")]
    pub min_historical_rate: f64,

    /// A pick's model probability must be above this
    #[arg(long, env = "MIN_MODEL_PROBABILITY", default_value = "0.85")]
    pub min_model_probability: f64,
}

impl ServeArgs {
    pub fn ranking_policy(&self) -> RankingPolicy {
        RankingPolicy {
            min_historical_rate: self.min_historical_rate,
            min_model_probability: self.min_model_probability,
        }
    }
}

impl Config {
    pub fn weights(&self) -> BlendWeights {
        BlendWeights {
            home_weight: self.home_weight,
            away_weight: self.away_weight,
            form_weight: self.form_weight,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        BlendWeights::new(self.home_weight, self.away_weight, self.form_weight)?;
        match &self.command {
            Command::Scrape(args) => {
                if args.api_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
                    anyhow::bail!("FOOTBALL_DATA_API_TOKEN is required for scraping");
                }
                if args.competitions.iter().all(|c| c.trim().is_empty()) {
                    anyhow::bail!("at least one competition is required");
                }
                if args.horizon_days < 0 {
                    anyhow::bail!("horizon_days must not be negative");
                }
            }
            Command::Serve(args) => {
                if args.top_n == 0 {
                    anyhow::bail!("top_n must be at least 1");
                }
                args.ranking_policy().validate()?;
            }
        }
        Ok(())
    }
}
