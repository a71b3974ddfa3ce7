use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use league_store::PgLeagueStore;
use nfl_stats_sync::{NflverseFetcher, StatsSync, SyncConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "nfl-stats-sync")]
#[command(about = "Sync nflverse stats, wins and playoff appearances into the league database")]
#[command(version = "0.1.0")]
struct Cli {
    /// Season to sync (defaults to LEAGUE_SEASON or the configured season)
    #[arg(short, long)]
    season: Option<i32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Season aggregate stats into week 0 rows
    Stats,

    /// Regular-season wins for starting QBs
    Wins,

    /// Playoff appearances and the Super Bowl winner
    Playoffs,

    /// Stats, then wins, then playoffs
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = SyncConfig::from_env().context("Failed to load configuration")?;
    let season = cli.season.unwrap_or(config.season);

    info!("Starting nflverse sync for season {}", season);

    let store = PgLeagueStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;
    let fetcher =
        NflverseFetcher::new(config.feeds.clone()).context("Failed to create HTTP client")?;
    let sync = StatsSync::new(fetcher, Arc::new(store));

    if matches!(cli.command, Commands::Stats | Commands::All) {
        let summary = sync
            .sync_season_stats(season)
            .await
            .context("Season stats sync failed")?;
        info!("Season stats: {}", serde_json::to_string(&summary)?);
    }

    if matches!(cli.command, Commands::Wins | Commands::All) {
        let summary = sync
            .sync_wins(season)
            .await
            .context("Wins sync failed")?;
        info!("Wins: {}", serde_json::to_string(&summary)?);
    }

    if matches!(cli.command, Commands::Playoffs | Commands::All) {
        let summary = sync
            .sync_playoffs(season)
            .await
            .context("Playoffs sync failed")?;
        info!("Playoffs: {}", serde_json::to_string(&summary)?);
    }

    Ok(())
}
