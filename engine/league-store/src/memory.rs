//! In-memory store for tests and local runs

use crate::error::{Result, StoreError};
use crate::models::*;
use crate::plan::{self, RowChange, SyncOutcome, SyncPlan, SyncWrite};
use crate::store::LeagueStore;
use scoring_engine::{BonusKind, PlayoffRound, PointsCalculator, StatLine};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    squads: BTreeMap<i64, Squad>,
    quarterbacks: BTreeMap<i64, Quarterback>,
    weekly_stats: BTreeMap<i64, WeeklyStat>,
    season_bonuses: BTreeMap<i64, SeasonBonus>,
    playoff_appearances: BTreeMap<i64, PlayoffAppearance>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_quarterback(&self, qb_id: i64) -> Result<&Quarterback> {
        self.quarterbacks
            .get(&qb_id)
            .ok_or_else(|| StoreError::quarterback_not_found(qb_id))
    }

    fn events_for(&self, quarterback: &Quarterback) -> QuarterbackEvents {
        let qb_id = quarterback.id;
        QuarterbackEvents {
            quarterback: quarterback.clone(),
            weekly_stats: self
                .weekly_stats
                .values()
                .filter(|s| s.qb_id == qb_id)
                .cloned()
                .collect(),
            season_bonuses: self
                .season_bonuses
                .values()
                .filter(|b| b.qb_id == qb_id)
                .cloned()
                .collect(),
            playoff_appearances: self
                .playoff_appearances
                .values()
                .filter(|p| p.qb_id == qb_id)
                .cloned()
                .collect(),
        }
    }

    fn roster_of(&self, squad: &Squad) -> SquadWithRoster {
        SquadWithRoster {
            squad: squad.clone(),
            quarterbacks: self
                .quarterbacks
                .values()
                .filter(|qb| qb.squad_id == Some(squad.id))
                .map(|qb| self.events_for(qb))
                .collect(),
        }
    }

    fn weekly_stat_id(&self, qb_id: i64, week: i32, season: i32) -> Option<i64> {
        self.weekly_stats
            .values()
            .find(|s| s.qb_id == qb_id && s.week == week && s.season == season)
            .map(|s| s.id)
    }

    fn playoff_id(&self, qb_id: i64, season: i32, round: PlayoffRound) -> Option<i64> {
        self.playoff_appearances
            .values()
            .find(|p| {
                p.qb_id == qb_id && p.season == season && p.round == round
            })
            .map(|p| p.id)
    }

    /// Write a stat line to the `(qb_id, week, season)` row, creating it if needed
    fn write_weekly(
        &mut self,
        calculator: &PointsCalculator,
        qb_id: i64,
        week: i32,
        season: i32,
        line: &StatLine,
    ) -> WeeklyStat {
        let points = calculator.weekly_points(line);
        let id = match self.weekly_stat_id(qb_id, week, season) {
            Some(id) => id,
            None => self.next_id(),
        };
        let stat = self.weekly_stats.entry(id).or_insert_with(|| WeeklyStat {
            id,
            qb_id,
            week,
            season,
            passing_yards: None,
            rushing_yards: None,
            passing_tds: None,
            rushing_tds: None,
            receiving_tds: None,
            interceptions: None,
            fumbles: None,
            game_won: None,
            prime_time_win: None,
            points: 0.0,
        });
        stat.set_stat_line(line);
        stat.points = points;
        stat.clone()
    }

    fn stat_line_at(&self, qb_id: i64, week: i32, season: i32) -> Option<StatLine> {
        self.weekly_stat_id(qb_id, week, season)
            .map(|id| self.weekly_stats[&id].stat_line())
    }

    fn apply_write(
        &mut self,
        calculator: &PointsCalculator,
        write: &SyncWrite,
        outcome: &mut SyncOutcome,
    ) {
        match write {
            SyncWrite::SeasonTotals {
                qb_id,
                season,
                totals,
            } => {
                let existing = self.stat_line_at(*qb_id, 0, *season);
                let change = plan::season_totals_change(totals, existing.as_ref());
                outcome.record(&change);
                if let RowChange::Insert(line) | RowChange::Update(line) = change {
                    self.write_weekly(calculator, *qb_id, 0, *season, &line);
                }
            }
            SyncWrite::Win {
                qb_id,
                season,
                week,
                prime_time,
            } => {
                let existing = self.stat_line_at(*qb_id, *week, *season);
                let change = plan::win_change(*prime_time, existing.as_ref());
                outcome.record(&change);
                if let RowChange::Insert(line) | RowChange::Update(line) = change {
                    self.write_weekly(calculator, *qb_id, *week, *season, &line);
                }
            }
            SyncWrite::Playoff {
                qb_id,
                season,
                round,
                won_super_bowl,
            } => {
                let existing_id = self.playoff_id(*qb_id, *season, *round);
                let existing = existing_id.map(|id| self.playoff_appearances[&id].won_super_bowl);
                let change = plan::playoff_change(*round, *won_super_bowl, existing);
                outcome.record(&change);
                match (change, existing_id) {
                    (RowChange::Update(won), Some(id)) => {
                        if let Some(appearance) = self.playoff_appearances.get_mut(&id) {
                            appearance.won_super_bowl = won;
                            appearance.points = calculator.playoff_points(*round, won);
                        }
                    }
                    (RowChange::Insert(won), _) => {
                        let id = self.next_id();
                        self.playoff_appearances.insert(
                            id,
                            PlayoffAppearance {
                                id,
                                qb_id: *qb_id,
                                season: *season,
                                round: *round,
                                won_super_bowl: won,
                                points: calculator.playoff_points(*round, won),
                            },
                        );
                    }
                    _ => {}
                }
            }
        }
    }
}

/// League store backed by ordered maps behind a single lock
#[derive(Debug, Default)]
pub struct MemoryLeagueStore {
    tables: RwLock<Tables>,
    calculator: PointsCalculator,
}

impl MemoryLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calculator(calculator: PointsCalculator) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            calculator,
        }
    }
}

#[async_trait::async_trait]
impl LeagueStore for MemoryLeagueStore {
    async fn create_squad(&self, squad: NewSquad) -> Result<Squad> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let squad = Squad {
            id,
            name: squad.name,
            owner: squad.owner,
            season: squad.season,
        };
        tables.squads.insert(id, squad.clone());
        Ok(squad)
    }

    async fn list_squads(&self, season: i32) -> Result<Vec<Squad>> {
        let tables = self.tables.read().await;
        Ok(tables
            .squads
            .values()
            .filter(|s| s.season == season)
            .cloned()
            .collect())
    }

    async fn get_squad(&self, squad_id: i64) -> Result<Option<Squad>> {
        Ok(self.tables.read().await.squads.get(&squad_id).cloned())
    }

    async fn create_quarterback(&self, quarterback: NewQuarterback) -> Result<Quarterback> {
        let mut tables = self.tables.write().await;
        if let Some(squad_id) = quarterback.squad_id {
            if !tables.squads.contains_key(&squad_id) {
                return Err(StoreError::squad_not_found(squad_id));
            }
        }
        let id = tables.next_id();
        let quarterback = Quarterback {
            id,
            name: quarterback.name,
            nfl_team: quarterback.nfl_team,
            season: quarterback.season,
            squad_id: quarterback.squad_id,
        };
        tables.quarterbacks.insert(id, quarterback.clone());
        Ok(quarterback)
    }

    async fn list_quarterbacks(&self, season: i32) -> Result<Vec<Quarterback>> {
        let tables = self.tables.read().await;
        Ok(tables
            .quarterbacks
            .values()
            .filter(|q| q.season == season)
            .cloned()
            .collect())
    }

    async fn get_quarterback(&self, qb_id: i64) -> Result<Option<Quarterback>> {
        let tables = self.tables.read().await;
        Ok(tables.quarterbacks.get(&qb_id).cloned())
    }

    async fn squad_rosters(&self, season: i32) -> Result<Vec<SquadWithRoster>> {
        let tables = self.tables.read().await;
        Ok(tables
            .squads
            .values()
            .filter(|s| s.season == season)
            .map(|s| tables.roster_of(s))
            .collect())
    }

    async fn squad_roster(&self, squad_id: i64) -> Result<Option<SquadWithRoster>> {
        let tables = self.tables.read().await;
        Ok(tables.squads.get(&squad_id).map(|s| tables.roster_of(s)))
    }

    async fn season_quarterback_events(&self, season: i32) -> Result<Vec<QuarterbackEvents>> {
        let tables = self.tables.read().await;
        Ok(tables
            .quarterbacks
            .values()
            .filter(|q| q.season == season)
            .map(|q| tables.events_for(q))
            .collect())
    }

    async fn quarterback_events(&self, qb_id: i64) -> Result<Option<QuarterbackEvents>> {
        let tables = self.tables.read().await;
        Ok(tables
            .quarterbacks
            .get(&qb_id)
            .map(|q| tables.events_for(q)))
    }

    async fn upsert_weekly_stat(&self, input: WeeklyStatInput) -> Result<WeeklyStat> {
        let mut tables = self.tables.write().await;
        tables.require_quarterback(input.qb_id)?;
        let stat = tables.write_weekly(
            &self.calculator,
            input.qb_id,
            input.week,
            input.season,
            &input.stats,
        );
        debug!(
            "Saved week {} stat for QB {}: {} pts",
            stat.week, stat.qb_id, stat.points
        );
        Ok(stat)
    }

    async fn add_season_bonus(&self, bonus: NewSeasonBonus) -> Result<SeasonBonus> {
        let mut tables = self.tables.write().await;
        tables.require_quarterback(bonus.qb_id)?;

        let exists = tables.season_bonuses.values().any(|b| {
            b.qb_id == bonus.qb_id && b.season == bonus.season && b.bonus_type == bonus.bonus_type
        });
        if exists {
            return Err(StoreError::duplicate(format!(
                "{} already exists for QB {} in {}",
                bonus.bonus_type, bonus.qb_id, bonus.season
            )));
        }

        let id = tables.next_id();
        let bonus = SeasonBonus {
            id,
            qb_id: bonus.qb_id,
            season: bonus.season,
            bonus_type: bonus.bonus_type,
            points: self.calculator.bonus_points(bonus.bonus_type),
        };
        tables.season_bonuses.insert(id, bonus.clone());
        Ok(bonus)
    }

    async fn add_playoff_appearance(
        &self,
        appearance: NewPlayoffAppearance,
    ) -> Result<PlayoffAppearance> {
        let mut tables = self.tables.write().await;
        tables.require_quarterback(appearance.qb_id)?;

        let existing = tables.playoff_id(appearance.qb_id, appearance.season, appearance.round);
        if existing.is_some() {
            return Err(StoreError::duplicate(format!(
                "{} appearance already exists for QB {} in {}",
                appearance.round, appearance.qb_id, appearance.season
            )));
        }

        let id = tables.next_id();
        let appearance = PlayoffAppearance {
            id,
            qb_id: appearance.qb_id,
            season: appearance.season,
            round: appearance.round,
            won_super_bowl: appearance.won_super_bowl,
            points: self
                .calculator
                .playoff_points(appearance.round, appearance.won_super_bowl),
        };
        tables.playoff_appearances.insert(id, appearance.clone());
        Ok(appearance)
    }

    async fn apply_sync_plan(&self, plan: SyncPlan) -> Result<SyncOutcome> {
        let mut tables = self.tables.write().await;

        // Nothing is written unless every write can be applied
        for write in &plan.writes {
            tables.require_quarterback(write.qb_id())?;
        }

        let mut outcome = SyncOutcome::default();
        for write in &plan.writes {
            tables.apply_write(&self.calculator, write, &mut outcome);
        }

        info!(
            "Applied sync plan: {} created, {} updated, {} skipped",
            outcome.created, outcome.updated, outcome.skipped
        );
        Ok(outcome)
    }

    async fn delete_season(&self, season: i32) -> Result<u64> {
        let mut tables = self.tables.write().await;

        let qb_ids: Vec<i64> = tables
            .quarterbacks
            .values()
            .filter(|q| q.season == season)
            .map(|q| q.id)
            .collect();
        tables.weekly_stats.retain(|_, s| !qb_ids.contains(&s.qb_id));
        tables.season_bonuses.retain(|_, b| !qb_ids.contains(&b.qb_id));
        tables.playoff_appearances.retain(|_, p| !qb_ids.contains(&p.qb_id));
        tables.quarterbacks.retain(|_, q| q.season != season);

        let before = tables.squads.len();
        tables.squads.retain(|_, s| s.season != season);
        Ok((before - tables.squads.len()) as u64)
    }

    async fn delete_season_bonuses(&self, season: i32, kinds: &[BonusKind]) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.season_bonuses.len();
        tables
            .season_bonuses
            .retain(|_, b| b.season != season || !kinds.contains(&b.bonus_type));
        Ok((before - tables.season_bonuses.len()) as u64)
    }
}
