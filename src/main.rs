use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

mod config;
mod dashboard;
mod db;
mod fixtures;
mod model;

use config::{Command, Config, ScrapeArgs, ServeArgs};
use dashboard::AppState;
use db::Database;
use fixtures::{run_scrape, FootballData, ScrapeOptions};
use model::BlendWeights;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    let weights = config.weights();
    info!(
        "Blend weights: home={:.2} away={:.2} form={:.2}",
        weights.home_weight, weights.away_weight, weights.form_weight
    );

    let db = Database::open(&config.database_path)?;
    info!("Database opened: {}", config.database_path);

    match &config.command {
        Command::Scrape(args) => scrape(args, &db, weights).await,
        Command::Serve(args) => serve(args, db, weights).await,
    }
}

async fn scrape(args: &ScrapeArgs, db: &Database, weights: BlendWeights) -> Result<()> {
    let token = args
        .api_token
        .as_deref()
        .context("FOOTBALL_DATA_API_TOKEN not set")?;
    let source = FootballData::new(
        token,
        &args.api_url,
        Duration::from_secs(args.rate_limit_wait_secs),
    )?;
    let opts = ScrapeOptions {
        competitions: args
            .competitions
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        horizon_days: args.horizon_days,
        form_window: args.form_window,
        weights,
    };
    run_scrape(&source, db, &opts, Utc::now()).await?;
    Ok(())
}

async fn serve(args: &ServeArgs, db: Database, weights: BlendWeights) -> Result<()> {
    let state = AppState {
        db,
        weights,
        policy: args.ranking_policy(),
        top_n: args.top_n,
    };
    let app = dashboard::router(state);
    let addr: SocketAddr = args
        .dashboard_addr
        .parse()
        .with_context(|| format!("invalid dashboard address {}", args.dashboard_addr))?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run dashboard server (blocks until shutdown)
    axum::serve(listener, app).await?;
    Ok(())
}
