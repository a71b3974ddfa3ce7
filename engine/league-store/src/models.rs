//! Row models for squads, quarterbacks and their scoring events

use crate::error::StoreError;
use scoring_engine::{
    BonusKind, PlayoffRound, QuarterbackLedger, QuarterbackRef, SquadRef, SquadRoster, StatLine,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Squad {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub season: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSquad {
    pub name: String,
    pub owner: String,
    pub season: i32,
}

/// A quarterback for one season; `squad_id == None` is a free agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quarterback {
    pub id: i64,
    pub name: String,
    pub nfl_team: String,
    pub season: i32,
    pub squad_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuarterback {
    pub name: String,
    pub nfl_team: String,
    pub season: i32,
    pub squad_id: Option<i64>,
}

/// One weekly stat line. Week 0 holds season aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeeklyStat {
    pub id: i64,
    pub qb_id: i64,
    pub week: i32,
    pub season: i32,
    pub passing_yards: Option<i32>,
    pub rushing_yards: Option<i32>,
    pub passing_tds: Option<i32>,
    pub rushing_tds: Option<i32>,
    pub receiving_tds: Option<i32>,
    pub interceptions: Option<i32>,
    pub fumbles: Option<i32>,
    pub game_won: Option<bool>,
    pub prime_time_win: Option<bool>,
    pub points: f64,
}

impl WeeklyStat {
    pub fn stat_line(&self) -> StatLine {
        StatLine {
            passing_yards: self.passing_yards,
            rushing_yards: self.rushing_yards,
            passing_tds: self.passing_tds,
            rushing_tds: self.rushing_tds,
            receiving_tds: self.receiving_tds,
            interceptions: self.interceptions,
            fumbles: self.fumbles,
            game_won: self.game_won,
            prime_time_win: self.prime_time_win,
        }
    }

    /// Overwrite the raw counters and flags; the caller recomputes `points`
    pub(crate) fn set_stat_line(&mut self, line: &StatLine) {
        self.passing_yards = line.passing_yards;
        self.rushing_yards = line.rushing_yards;
        self.passing_tds = line.passing_tds;
        self.rushing_tds = line.rushing_tds;
        self.receiving_tds = line.receiving_tds;
        self.interceptions = line.interceptions;
        self.fumbles = line.fumbles;
        self.game_won = line.game_won;
        self.prime_time_win = line.prime_time_win;
    }
}

/// Upsert payload for a weekly stat, keyed by `(qb_id, week, season)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStatInput {
    pub qb_id: i64,
    pub week: i32,
    pub season: i32,
    #[serde(flatten)]
    pub stats: StatLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonBonus {
    pub id: i64,
    pub qb_id: i64,
    pub season: i32,
    pub bonus_type: BonusKind,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSeasonBonus {
    pub qb_id: i64,
    pub season: i32,
    pub bonus_type: BonusKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffAppearance {
    pub id: i64,
    pub qb_id: i64,
    pub season: i32,
    pub round: PlayoffRound,
    pub won_super_bowl: bool,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayoffAppearance {
    pub qb_id: i64,
    pub season: i32,
    pub round: PlayoffRound,
    #[serde(default)]
    pub won_super_bowl: bool,
}

/// Raw `season_bonuses` row; the bonus code is stored as text
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SeasonBonusRow {
    pub id: i64,
    pub qb_id: i64,
    pub season: i32,
    pub bonus_type: String,
    pub points: f64,
}

impl TryFrom<SeasonBonusRow> for SeasonBonus {
    type Error = StoreError;

    fn try_from(row: SeasonBonusRow) -> Result<Self, Self::Error> {
        let bonus_type = row
            .bonus_type
            .parse()
            .map_err(|e| StoreError::invalid_data(format!("season_bonuses.{}: {}", row.id, e)))?;
        Ok(Self {
            id: row.id,
            qb_id: row.qb_id,
            season: row.season,
            bonus_type,
            points: row.points,
        })
    }
}

/// Raw `playoff_appearances` row; the round code is stored as text
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PlayoffAppearanceRow {
    pub id: i64,
    pub qb_id: i64,
    pub season: i32,
    pub round: String,
    pub won_super_bowl: bool,
    pub points: f64,
}

impl TryFrom<PlayoffAppearanceRow> for PlayoffAppearance {
    type Error = StoreError;

    fn try_from(row: PlayoffAppearanceRow) -> Result<Self, Self::Error> {
        let round = row.round.parse().map_err(|e| {
            StoreError::invalid_data(format!("playoff_appearances.{}: {}", row.id, e))
        })?;
        Ok(Self {
            id: row.id,
            qb_id: row.qb_id,
            season: row.season,
            round,
            won_super_bowl: row.won_super_bowl,
            points: row.points,
        })
    }
}

/// A quarterback with every scoring event it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterbackEvents {
    pub quarterback: Quarterback,
    pub weekly_stats: Vec<WeeklyStat>,
    pub season_bonuses: Vec<SeasonBonus>,
    pub playoff_appearances: Vec<PlayoffAppearance>,
}

impl QuarterbackEvents {
    pub fn new(quarterback: Quarterback) -> Self {
        Self {
            quarterback,
            weekly_stats: Vec::new(),
            season_bonuses: Vec::new(),
            playoff_appearances: Vec::new(),
        }
    }

    /// Persisted points per event, in the shape the aggregators consume
    pub fn ledger(&self) -> QuarterbackLedger {
        QuarterbackLedger {
            quarterback: QuarterbackRef {
                id: self.quarterback.id,
                name: self.quarterback.name.clone(),
                nfl_team: self.quarterback.nfl_team.clone(),
                squad_id: self.quarterback.squad_id,
            },
            weekly_points: self.weekly_stats.iter().map(|s| s.points).collect(),
            bonus_points: self.season_bonuses.iter().map(|b| b.points).collect(),
            playoff_points: self.playoff_appearances.iter().map(|p| p.points).collect(),
        }
    }
}

/// A squad and its quarterbacks in QB id order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadWithRoster {
    pub squad: Squad,
    pub quarterbacks: Vec<QuarterbackEvents>,
}

impl SquadWithRoster {
    pub fn roster(&self) -> SquadRoster {
        SquadRoster {
            squad: SquadRef {
                id: self.squad.id,
                name: self.squad.name.clone(),
                owner: self.squad.owner.clone(),
            },
            quarterbacks: self.quarterbacks.iter().map(QuarterbackEvents::ledger).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_stat_input_accepts_flat_payload() {
        let input: WeeklyStatInput = serde_json::from_str(
            r#"{"qb_id": 4, "week": 3, "season": 2025, "passing_yards": 250, "game_won": true}"#,
        )
        .unwrap();
        assert_eq!(input.qb_id, 4);
        assert_eq!(input.stats.passing_yards, Some(250));
        assert_eq!(input.stats.interceptions, None);
        assert!(input.stats.is_win());
    }

    #[test]
    fn test_bonus_row_with_unknown_code_is_invalid() {
        let row = SeasonBonusRow {
            id: 1,
            qb_id: 2,
            season: 2025,
            bonus_type: "MVP_9TH".into(),
            points: 0.0,
        };
        assert!(matches!(
            SeasonBonus::try_from(row),
            Err(StoreError::InvalidData(_))
        ));

        let row = PlayoffAppearanceRow {
            id: 1,
            qb_id: 2,
            season: 2025,
            round: "SUPER_BOWL".into(),
            won_super_bowl: true,
            points: 40.0,
        };
        assert_eq!(
            PlayoffAppearance::try_from(row).unwrap().round,
            PlayoffRound::SuperBowl
        );
    }

    #[test]
    fn test_ledger_carries_persisted_points() {
        let qb = Quarterback {
            id: 7,
            name: "A".into(),
            nfl_team: "BUF".into(),
            season: 2025,
            squad_id: None,
        };
        let mut events = QuarterbackEvents::new(qb);
        events.season_bonuses.push(SeasonBonus {
            id: 1,
            qb_id: 7,
            season: 2025,
            bonus_type: BonusKind::Mvp,
            points: 50.0,
        });

        let ledger = events.ledger();
        assert_eq!(ledger.bonus_points, vec![50.0]);
        assert!(ledger.weekly_points.is_empty());
        assert_eq!(ledger.quarterback.squad_id, None);
    }
}
