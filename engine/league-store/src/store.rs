//! Storage trait shared by the Postgres and in-memory backends

use crate::error::Result;
use crate::models::*;
use crate::plan::{SyncOutcome, SyncPlan};
use scoring_engine::BonusKind;

/// Persistence for the league.
///
/// Every write that creates an event or changes its raw inputs recomputes
/// the event's `points` before it is stored. Reads return events with the
/// points as persisted.
#[async_trait::async_trait]
pub trait LeagueStore: Send + Sync {
    async fn create_squad(&self, squad: NewSquad) -> Result<Squad>;

    /// Squads of a season in id order
    async fn list_squads(&self, season: i32) -> Result<Vec<Squad>>;

    async fn get_squad(&self, squad_id: i64) -> Result<Option<Squad>>;

    async fn create_quarterback(&self, quarterback: NewQuarterback) -> Result<Quarterback>;

    /// Quarterbacks of a season in id order, free agents included
    async fn list_quarterbacks(&self, season: i32) -> Result<Vec<Quarterback>>;

    async fn get_quarterback(&self, qb_id: i64) -> Result<Option<Quarterback>>;

    /// Every squad of a season with its quarterbacks and their events
    async fn squad_rosters(&self, season: i32) -> Result<Vec<SquadWithRoster>>;

    async fn squad_roster(&self, squad_id: i64) -> Result<Option<SquadWithRoster>>;

    /// Every quarterback of a season with its events
    async fn season_quarterback_events(&self, season: i32) -> Result<Vec<QuarterbackEvents>>;

    async fn quarterback_events(&self, qb_id: i64) -> Result<Option<QuarterbackEvents>>;

    /// Insert or replace the stat line for `(qb_id, week, season)`
    async fn upsert_weekly_stat(&self, input: WeeklyStatInput) -> Result<WeeklyStat>;

    /// Create-only; an existing `(qb_id, season, bonus_type)` is a duplicate
    async fn add_season_bonus(&self, bonus: NewSeasonBonus) -> Result<SeasonBonus>;

    /// Create-only; an existing `(qb_id, season, round)` is a duplicate
    async fn add_playoff_appearance(
        &self,
        appearance: NewPlayoffAppearance,
    ) -> Result<PlayoffAppearance>;

    /// Apply every write of the plan in a single commit
    async fn apply_sync_plan(&self, plan: SyncPlan) -> Result<SyncOutcome>;

    /// Remove a season's squads, quarterbacks and events. Returns squads removed.
    async fn delete_season(&self, season: i32) -> Result<u64>;

    /// Remove a season's bonuses of the given kinds. Returns rows removed.
    async fn delete_season_bonuses(&self, season: i32, kinds: &[BonusKind]) -> Result<u64>;
}
