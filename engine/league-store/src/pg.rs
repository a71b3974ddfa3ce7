//! Postgres store

use crate::error::{Result, StoreError};
use crate::models::*;
use crate::plan::{self, RowChange, SyncOutcome, SyncPlan, SyncWrite};
use crate::store::LeagueStore;
use scoring_engine::{BonusKind, PlayoffRound, PointsCalculator, StatLine};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::{debug, info};

const WEEKLY_COLUMNS: &str = "id, qb_id, week, season, passing_yards, rushing_yards, passing_tds, \
     rushing_tds, receiving_tds, interceptions, fumbles, game_won, prime_time_win, points";

/// League store backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct PgLeagueStore {
    pool: PgPool,
    calculator: PointsCalculator,
}

impl PgLeagueStore {
    /// Connect, run embedded migrations and return the store
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Connected to league database");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            calculator: PointsCalculator::default(),
        }
    }

    pub fn with_calculator(mut self, calculator: PointsCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn require_quarterback(&self, qb_id: i64) -> Result<()> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM quarterbacks WHERE id = $1")
            .bind(qb_id)
            .fetch_optional(&self.pool)
            .await?;
        found
            .map(|_| ())
            .ok_or_else(|| StoreError::quarterback_not_found(qb_id))
    }

    /// Events for a set of quarterbacks, grouped per QB in the order given
    async fn events_for(&self, quarterbacks: Vec<Quarterback>) -> Result<Vec<QuarterbackEvents>> {
        if quarterbacks.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = quarterbacks.iter().map(|q| q.id).collect();

        let weekly: Vec<WeeklyStat> = sqlx::query_as(&format!(
            "SELECT {} FROM weekly_stats WHERE qb_id = ANY($1) ORDER BY season, week, id",
            WEEKLY_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let bonuses: Vec<SeasonBonusRow> = sqlx::query_as(
            "SELECT id, qb_id, season, bonus_type, points FROM season_bonuses \
             WHERE qb_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let playoffs: Vec<PlayoffAppearanceRow> = sqlx::query_as(
            "SELECT id, qb_id, season, round, won_super_bowl, points FROM playoff_appearances \
             WHERE qb_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_qb: HashMap<i64, QuarterbackEvents> = quarterbacks
            .iter()
            .map(|q| (q.id, QuarterbackEvents::new(q.clone())))
            .collect();

        for stat in weekly {
            if let Some(events) = by_qb.get_mut(&stat.qb_id) {
                events.weekly_stats.push(stat);
            }
        }
        for row in bonuses {
            let bonus = SeasonBonus::try_from(row)?;
            if let Some(events) = by_qb.get_mut(&bonus.qb_id) {
                events.season_bonuses.push(bonus);
            }
        }
        for row in playoffs {
            let appearance = PlayoffAppearance::try_from(row)?;
            if let Some(events) = by_qb.get_mut(&appearance.qb_id) {
                events.playoff_appearances.push(appearance);
            }
        }

        Ok(quarterbacks
            .iter()
            .filter_map(|q| by_qb.remove(&q.id))
            .collect())
    }

    async fn rosters_for(&self, squads: Vec<Squad>) -> Result<Vec<SquadWithRoster>> {
        let squad_ids: Vec<i64> = squads.iter().map(|s| s.id).collect();
        let quarterbacks: Vec<Quarterback> = sqlx::query_as(
            "SELECT id, name, nfl_team, season, squad_id FROM quarterbacks \
             WHERE squad_id = ANY($1) ORDER BY id",
        )
        .bind(&squad_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut events = self.events_for(quarterbacks).await?;
        let mut rosters = Vec::with_capacity(squads.len());
        for squad in squads {
            let (mine, rest): (Vec<_>, Vec<_>) = events
                .into_iter()
                .partition(|e| e.quarterback.squad_id == Some(squad.id));
            events = rest;
            rosters.push(SquadWithRoster {
                squad,
                quarterbacks: mine,
            });
        }
        Ok(rosters)
    }

    async fn weekly_for_update(
        tx: &mut Transaction<'_, Postgres>,
        qb_id: i64,
        week: i32,
        season: i32,
    ) -> Result<Option<WeeklyStat>> {
        let stat = sqlx::query_as(&format!(
            "SELECT {} FROM weekly_stats \
             WHERE qb_id = $1 AND week = $2 AND season = $3 FOR UPDATE",
            WEEKLY_COLUMNS
        ))
        .bind(qb_id)
        .bind(week)
        .bind(season)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(stat)
    }

    /// Write a stat line and its freshly computed points to `(qb_id, week, season)`
    async fn write_weekly(
        conn: &mut PgConnection,
        calculator: &PointsCalculator,
        qb_id: i64,
        week: i32,
        season: i32,
        line: &StatLine,
    ) -> Result<WeeklyStat> {
        let points = calculator.weekly_points(line);
        let stat = sqlx::query_as(&format!(
            r#"
            INSERT INTO weekly_stats (qb_id, week, season, passing_yards, rushing_yards,
                passing_tds, rushing_tds, receiving_tds, interceptions, fumbles, game_won,
                prime_time_win, points)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (qb_id, week, season) DO UPDATE SET
                passing_yards = EXCLUDED.passing_yards,
                rushing_yards = EXCLUDED.rushing_yards,
                passing_tds = EXCLUDED.passing_tds,
                rushing_tds = EXCLUDED.rushing_tds,
                receiving_tds = EXCLUDED.receiving_tds,
                interceptions = EXCLUDED.interceptions,
                fumbles = EXCLUDED.fumbles,
                game_won = EXCLUDED.game_won,
                prime_time_win = EXCLUDED.prime_time_win,
                points = EXCLUDED.points
            RETURNING {}
            "#,
            WEEKLY_COLUMNS
        ))
        .bind(qb_id)
        .bind(week)
        .bind(season)
        .bind(line.passing_yards)
        .bind(line.rushing_yards)
        .bind(line.passing_tds)
        .bind(line.rushing_tds)
        .bind(line.receiving_tds)
        .bind(line.interceptions)
        .bind(line.fumbles)
        .bind(line.game_won)
        .bind(line.prime_time_win)
        .bind(points)
        .fetch_one(&mut *conn)
        .await?;
        Ok(stat)
    }

    async fn apply_write(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        write: &SyncWrite,
        outcome: &mut SyncOutcome,
    ) -> Result<()> {
        match write {
            SyncWrite::SeasonTotals {
                qb_id,
                season,
                totals,
            } => {
                let existing = Self::weekly_for_update(tx, *qb_id, 0, *season)
                    .await?
                    .map(|s| s.stat_line());
                let change = plan::season_totals_change(totals, existing.as_ref());
                outcome.record(&change);
                if let RowChange::Insert(line) | RowChange::Update(line) = change {
                    let calculator = &self.calculator;
                    Self::write_weekly(&mut **tx, calculator, *qb_id, 0, *season, &line).await?;
                }
            }
            SyncWrite::Win {
                qb_id,
                season,
                week,
                prime_time,
            } => {
                let existing = Self::weekly_for_update(tx, *qb_id, *week, *season)
                    .await?
                    .map(|s| s.stat_line());
                let change = plan::win_change(*prime_time, existing.as_ref());
                outcome.record(&change);
                if let RowChange::Insert(line) | RowChange::Update(line) = change {
                    let calculator = &self.calculator;
                    Self::write_weekly(&mut **tx, calculator, *qb_id, *week, *season, &line)
                        .await?;
                }
            }
            SyncWrite::Playoff {
                qb_id,
                season,
                round,
                won_super_bowl,
            } => {
                let existing: Option<(i64, bool)> = sqlx::query_as(
                    "SELECT id, won_super_bowl FROM playoff_appearances \
                     WHERE qb_id = $1 AND season = $2 AND round = $3 FOR UPDATE",
                )
                .bind(qb_id)
                .bind(season)
                .bind(round.code())
                .fetch_optional(&mut **tx)
                .await?;

                let existing_won = existing.map(|(_, won)| won);
                let change = plan::playoff_change(*round, *won_super_bowl, existing_won);
                outcome.record(&change);
                match (change, existing) {
                    (RowChange::Update(won), Some((id, _))) => {
                        sqlx::query(
                            "UPDATE playoff_appearances SET won_super_bowl = $1, points = $2 \
                             WHERE id = $3",
                        )
                        .bind(won)
                        .bind(self.calculator.playoff_points(*round, won))
                        .bind(id)
                        .execute(&mut **tx)
                        .await?;
                    }
                    (RowChange::Insert(won), _) => {
                        let calculator = &self.calculator;
                        insert_playoff(&mut **tx, calculator, *qb_id, *season, *round, won).await?;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

async fn insert_playoff(
    conn: &mut PgConnection,
    calculator: &PointsCalculator,
    qb_id: i64,
    season: i32,
    round: PlayoffRound,
    won_super_bowl: bool,
) -> Result<Option<PlayoffAppearanceRow>> {
    let row = sqlx::query_as(
        "INSERT INTO playoff_appearances (qb_id, season, round, won_super_bowl, points) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (qb_id, season, round) DO NOTHING \
         RETURNING id, qb_id, season, round, won_super_bowl, points",
    )
    .bind(qb_id)
    .bind(season)
    .bind(round.code())
    .bind(won_super_bowl)
    .bind(calculator.playoff_points(round, won_super_bowl))
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

#[async_trait::async_trait]
impl LeagueStore for PgLeagueStore {
    async fn create_squad(&self, squad: NewSquad) -> Result<Squad> {
        let squad = sqlx::query_as(
            "INSERT INTO squads (name, owner, season) VALUES ($1, $2, $3) \
             RETURNING id, name, owner, season",
        )
        .bind(&squad.name)
        .bind(&squad.owner)
        .bind(squad.season)
        .fetch_one(&self.pool)
        .await?;
        Ok(squad)
    }

    async fn list_squads(&self, season: i32) -> Result<Vec<Squad>> {
        let squads = sqlx::query_as(
            "SELECT id, name, owner, season FROM squads WHERE season = $1 ORDER BY id",
        )
        .bind(season)
        .fetch_all(&self.pool)
        .await?;
        Ok(squads)
    }

    async fn get_squad(&self, squad_id: i64) -> Result<Option<Squad>> {
        let squad = sqlx::query_as("SELECT id, name, owner, season FROM squads WHERE id = $1")
            .bind(squad_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(squad)
    }

    async fn create_quarterback(&self, quarterback: NewQuarterback) -> Result<Quarterback> {
        if let Some(squad_id) = quarterback.squad_id {
            if self.get_squad(squad_id).await?.is_none() {
                return Err(StoreError::squad_not_found(squad_id));
            }
        }
        let quarterback = sqlx::query_as(
            "INSERT INTO quarterbacks (name, nfl_team, season, squad_id) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, nfl_team, season, squad_id",
        )
        .bind(&quarterback.name)
        .bind(&quarterback.nfl_team)
        .bind(quarterback.season)
        .bind(quarterback.squad_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(quarterback)
    }

    async fn list_quarterbacks(&self, season: i32) -> Result<Vec<Quarterback>> {
        let quarterbacks = sqlx::query_as(
            "SELECT id, name, nfl_team, season, squad_id FROM quarterbacks \
             WHERE season = $1 ORDER BY id",
        )
        .bind(season)
        .fetch_all(&self.pool)
        .await?;
        Ok(quarterbacks)
    }

    async fn get_quarterback(&self, qb_id: i64) -> Result<Option<Quarterback>> {
        let quarterback = sqlx::query_as(
            "SELECT id, name, nfl_team, season, squad_id FROM quarterbacks WHERE id = $1",
        )
        .bind(qb_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quarterback)
    }

    async fn squad_rosters(&self, season: i32) -> Result<Vec<SquadWithRoster>> {
        let squads = self.list_squads(season).await?;
        self.rosters_for(squads).await
    }

    async fn squad_roster(&self, squad_id: i64) -> Result<Option<SquadWithRoster>> {
        match self.get_squad(squad_id).await? {
            Some(squad) => {
                let mut rosters = self.rosters_for(vec![squad]).await?;
                Ok(rosters.pop())
            }
            None => Ok(None),
        }
    }

    async fn season_quarterback_events(&self, season: i32) -> Result<Vec<QuarterbackEvents>> {
        let quarterbacks = self.list_quarterbacks(season).await?;
        self.events_for(quarterbacks).await
    }

    async fn quarterback_events(&self, qb_id: i64) -> Result<Option<QuarterbackEvents>> {
        match self.get_quarterback(qb_id).await? {
            Some(qb) => Ok(self.events_for(vec![qb]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn upsert_weekly_stat(&self, input: WeeklyStatInput) -> Result<WeeklyStat> {
        self.require_quarterback(input.qb_id).await?;
        let mut conn = self.pool.acquire().await?;
        let stat = Self::write_weekly(
            &mut conn,
            &self.calculator,
            input.qb_id,
            input.week,
            input.season,
            &input.stats,
        )
        .await?;
        debug!(
            "Saved week {} stat for QB {}: {} pts",
            stat.week, stat.qb_id, stat.points
        );
        Ok(stat)
    }

    async fn add_season_bonus(&self, bonus: NewSeasonBonus) -> Result<SeasonBonus> {
        self.require_quarterback(bonus.qb_id).await?;

        let row: Option<SeasonBonusRow> = sqlx::query_as(
            "INSERT INTO season_bonuses (qb_id, season, bonus_type, points) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (qb_id, season, bonus_type) DO NOTHING \
             RETURNING id, qb_id, season, bonus_type, points",
        )
        .bind(bonus.qb_id)
        .bind(bonus.season)
        .bind(bonus.bonus_type.code())
        .bind(self.calculator.bonus_points(bonus.bonus_type))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => SeasonBonus::try_from(row),
            None => Err(StoreError::duplicate(format!(
                "{} already exists for QB {} in {}",
                bonus.bonus_type, bonus.qb_id, bonus.season
            ))),
        }
    }

    async fn add_playoff_appearance(
        &self,
        appearance: NewPlayoffAppearance,
    ) -> Result<PlayoffAppearance> {
        self.require_quarterback(appearance.qb_id).await?;

        let mut conn = self.pool.acquire().await?;
        let row = insert_playoff(
            &mut conn,
            &self.calculator,
            appearance.qb_id,
            appearance.season,
            appearance.round,
            appearance.won_super_bowl,
        )
        .await?;

        match row {
            Some(row) => PlayoffAppearance::try_from(row),
            None => Err(StoreError::duplicate(format!(
                "{} appearance already exists for QB {} in {}",
                appearance.round, appearance.qb_id, appearance.season
            ))),
        }
    }

    async fn apply_sync_plan(&self, plan: SyncPlan) -> Result<SyncOutcome> {
        let mut tx = self.pool.begin().await?;
        let mut outcome = SyncOutcome::default();

        for write in &plan.writes {
            self.apply_write(&mut tx, write, &mut outcome).await?;
        }

        // Dropping the transaction on an early return rolls every write back
        tx.commit().await?;

        info!(
            "Applied sync plan: {} created, {} updated, {} skipped",
            outcome.created, outcome.updated, outcome.skipped
        );
        Ok(outcome)
    }

    async fn delete_season(&self, season: i32) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        // Events cascade from quarterbacks
        sqlx::query("DELETE FROM quarterbacks WHERE season = $1")
            .bind(season)
            .execute(&mut *tx)
            .await?;
        let squads = sqlx::query("DELETE FROM squads WHERE season = $1")
            .bind(season)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(squads)
    }

    async fn delete_season_bonuses(&self, season: i32, kinds: &[BonusKind]) -> Result<u64> {
        let codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        let removed = sqlx::query(
            "DELETE FROM season_bonuses WHERE season = $1 AND bonus_type = ANY($2)",
        )
        .bind(season)
        .bind(&codes)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(removed)
    }
}
