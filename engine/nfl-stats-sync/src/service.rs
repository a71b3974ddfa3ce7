use crate::error::Result;
use crate::fetcher::NflverseFetcher;
use crate::reconcile::{self, RosterIndex};
use league_store::LeagueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStatsSummary {
    pub season: i32,
    pub total_synced: usize,
    pub created: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinsSummary {
    pub season: i32,
    pub total_wins_synced: usize,
    pub created: usize,
    pub updated: usize,
    pub games_checked: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffsSummary {
    pub season: i32,
    pub total_appearances_synced: usize,
    pub created: usize,
    pub skipped_existing: usize,
    pub playoff_games_checked: usize,
}

/// Fetch, plan and apply for one feed at a time
#[derive(Clone)]
pub struct StatsSync {
    fetcher: NflverseFetcher,
    store: Arc<dyn LeagueStore>,
}

impl StatsSync {
    pub fn new(fetcher: NflverseFetcher, store: Arc<dyn LeagueStore>) -> Self {
        Self { fetcher, store }
    }

    async fn roster(&self, season: i32) -> Result<RosterIndex> {
        let quarterbacks = self.store.list_quarterbacks(season).await?;
        Ok(RosterIndex::new(&quarterbacks))
    }

    /// Upsert week 0 season totals for every rostered QB
    pub async fn sync_season_stats(&self, season: i32) -> Result<SeasonStatsSummary> {
        let rows = self.fetcher.fetch_season_stats(season).await?;
        let roster = self.roster(season).await?;

        let planned = reconcile::plan_season_stats(season, &rows, &roster);
        let outcome = self.store.apply_sync_plan(planned.plan).await?;

        info!(
            "Synced season stats for {}: {} created, {} updated",
            season, outcome.created, outcome.updated
        );
        Ok(SeasonStatsSummary {
            season,
            total_synced: outcome.synced(),
            created: outcome.created,
            updated: outcome.updated,
        })
    }

    /// Credit regular-season wins to starting QBs
    pub async fn sync_wins(&self, season: i32) -> Result<WinsSummary> {
        let games = self.fetcher.fetch_schedules().await?;
        let roster = self.roster(season).await?;

        let planned = reconcile::plan_wins(season, &games, &roster);
        let outcome = self.store.apply_sync_plan(planned.plan).await?;

        info!(
            "Synced wins for {}: {} created, {} updated, {} games checked",
            season, outcome.created, outcome.updated, planned.rows_checked
        );
        Ok(WinsSummary {
            season,
            total_wins_synced: outcome.synced(),
            created: outcome.created,
            updated: outcome.updated,
            games_checked: planned.rows_checked,
        })
    }

    /// Record playoff appearances for both QBs of each completed playoff game
    pub async fn sync_playoffs(&self, season: i32) -> Result<PlayoffsSummary> {
        let games = self.fetcher.fetch_schedules().await?;
        let roster = self.roster(season).await?;

        let planned = reconcile::plan_playoffs(season, &games, &roster);
        let outcome = self.store.apply_sync_plan(planned.plan).await?;

        info!(
            "Synced playoffs for {}: {} created, {} updated, {} skipped",
            season, outcome.created, outcome.updated, outcome.skipped
        );
        Ok(PlayoffsSummary {
            season,
            total_appearances_synced: outcome.synced(),
            created: outcome.created,
            skipped_existing: outcome.skipped,
            playoff_games_checked: planned.rows_checked,
        })
    }
}
