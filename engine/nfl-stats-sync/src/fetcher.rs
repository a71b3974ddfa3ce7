use crate::config::FeedConfig;
use crate::error::{Result, SyncError};
use crate::models::{PlayerSeasonRow, ScheduleRow};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::info;

/// Client for the nflverse CSV releases
#[derive(Debug, Clone)]
pub struct NflverseFetcher {
    config: FeedConfig,
    client: Client,
}

impl NflverseFetcher {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Regular-season totals for every player in a season
    pub async fn fetch_season_stats(&self, season: i32) -> Result<Vec<PlayerSeasonRow>> {
        let url = self.config.season_stats_url(season);
        let body = self.get_text(&url).await?;
        let rows = parse_csv(&body)?;
        info!("Fetched {} player season rows for {}", rows.len(), season);
        Ok(rows)
    }

    /// The full schedule; callers filter by season
    pub async fn fetch_schedules(&self) -> Result<Vec<ScheduleRow>> {
        let url = self.config.schedules_url.clone();
        let body = self.get_text(&url).await?;
        let rows = parse_csv(&body)?;
        info!("Fetched {} schedule rows", rows.len());
        Ok(rows)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        info!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SyncError::UpstreamStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Deserialize CSV rows by header name; unknown columns are ignored
pub fn parse_csv<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
