use anyhow::{Context, Result};
use league_api::{create_routes, logging, AdminAuthorizer, ApiConfig, SharedSecretAuthorizer};
use league_store::{LeagueStore, PgLeagueStore};
use nfl_stats_sync::{NflverseFetcher, StatsSync};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;
    logging::initialize_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Starting Howell League API v{}", env!("CARGO_PKG_VERSION"));
    if config.admin_password.is_none() {
        warn!("ADMIN_PASSWORD is not set; admin endpoints will refuse every request");
    }

    let store: Arc<dyn LeagueStore> = Arc::new(
        PgLeagueStore::connect(&config.database.url, config.database.max_connections)
            .await
            .context("Failed to connect to database")?,
    );
    info!("Connected to database");

    let fetcher =
        NflverseFetcher::new(config.feeds.clone()).context("Failed to create HTTP client")?;
    let sync = Arc::new(StatsSync::new(fetcher, store.clone()));
    let auth: Arc<dyn AdminAuthorizer> = Arc::new(SharedSecretAuthorizer::new(
        config.admin_password.clone(),
    ));

    let (host, port) = (config.server.host, config.server.port);
    let routes = create_routes(store, sync, auth, Arc::new(config));

    info!("Listening on {}:{}", std::net::Ipv4Addr::from(host), port);
    let (_, server) = warp::serve(routes).bind_with_graceful_shutdown((host, port), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Shutdown signal received");
    });
    server.await;

    info!("Howell League API stopped");
    Ok(())
}
