//! Turns feed rows into a [`SyncPlan`] for the season's roster
//!
//! Planning is pure: it only needs the feed rows and the season's
//! quarterbacks. Players are matched to quarterbacks by exact name.

use crate::models::{counter, PlayerSeasonRow, ScheduleRow, Side};
use league_store::{Quarterback, SyncPlan, SyncWrite};
use scoring_engine::{PlayoffRound, StatLine};
use std::collections::HashMap;
use tracing::debug;

/// A plan plus how much of the feed it looked at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Planned {
    pub plan: SyncPlan,

    /// Feed rows (players or games) considered
    pub rows_checked: usize,
}

/// Exact-name lookup over a season's quarterbacks
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    by_name: HashMap<String, i64>,
}

impl RosterIndex {
    pub fn new(quarterbacks: &[Quarterback]) -> Self {
        // A repeated name resolves to the last quarterback listed
        let by_name = quarterbacks
            .iter()
            .map(|qb| (qb.name.clone(), qb.id))
            .collect();
        Self { by_name }
    }

    pub fn lookup(&self, name: Option<&str>) -> Option<i64> {
        name.and_then(|n| self.by_name.get(n).copied())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Map a schedule game type to its playoff round
pub fn playoff_round(game_type: &str) -> Option<PlayoffRound> {
    match game_type {
        "WC" => Some(PlayoffRound::WildCard),
        "DIV" => Some(PlayoffRound::Divisional),
        "CON" => Some(PlayoffRound::ConfChampionship),
        "SB" => Some(PlayoffRound::SuperBowl),
        _ => None,
    }
}

/// Week 0 season totals for every rostered QB in the feed
pub fn plan_season_stats(
    season: i32,
    rows: &[PlayerSeasonRow],
    roster: &RosterIndex,
) -> Planned {
    let mut planned = Planned::default();

    for row in rows.iter().filter(|r| r.is_quarterback()) {
        planned.rows_checked += 1;

        let qb_id = roster
            .lookup(row.player_name.as_deref())
            .or_else(|| roster.lookup(row.player_display_name.as_deref()));
        let Some(qb_id) = qb_id else {
            continue;
        };

        let totals = StatLine {
            passing_yards: Some(counter(row.passing_yards)),
            rushing_yards: Some(counter(row.rushing_yards)),
            passing_tds: Some(counter(row.passing_tds)),
            rushing_tds: Some(counter(row.rushing_tds)),
            receiving_tds: Some(0),
            interceptions: Some(counter(row.passing_interceptions)),
            fumbles: Some(counter(row.sack_fumbles_lost)),
            game_won: None,
            prime_time_win: None,
        };
        planned.plan.push(SyncWrite::SeasonTotals {
            qb_id,
            season,
            totals,
        });
    }

    debug!(
        "Planned {} season total rows from {} QB rows",
        planned.plan.len(),
        planned.rows_checked
    );
    planned
}

/// Wins for the starting QB of each completed regular-season game
pub fn plan_wins(season: i32, games: &[ScheduleRow], roster: &RosterIndex) -> Planned {
    let mut planned = Planned::default();

    let completed = games
        .iter()
        .filter(|g| {
            g.season == season && g.game_type == "REG" && g.is_complete()
        });

    for game in completed {
        planned.rows_checked += 1;

        let Some(side) = game.winner() else {
            continue;
        };
        let Some(qb_id) = roster.lookup(game.qb_name(side)) else {
            continue;
        };

        planned.plan.push(SyncWrite::Win {
            qb_id,
            season,
            week: game.week,
            prime_time: game.is_prime_time(),
        });
    }

    debug!(
        "Planned {} wins from {} completed games",
        planned.plan.len(),
        planned.rows_checked
    );
    planned
}

/// An appearance for both QBs of each completed playoff game
pub fn plan_playoffs(season: i32, games: &[ScheduleRow], roster: &RosterIndex) -> Planned {
    let mut planned = Planned::default();

    let completed = games
        .iter()
        .filter(|g| g.season == season && g.is_complete());

    for game in completed {
        let Some(round) = playoff_round(&game.game_type) else {
            continue;
        };
        planned.rows_checked += 1;

        let winner = game.winner();
        for side in [Side::Home, Side::Away] {
            let Some(qb_id) = roster.lookup(game.qb_name(side)) else {
                continue;
            };
            let won_super_bowl = round == PlayoffRound::SuperBowl && winner == Some(side);
            planned.plan.push(SyncWrite::Playoff {
                qb_id,
                season,
                round,
                won_super_bowl,
            });
        }
    }

    debug!(
        "Planned {} playoff appearances from {} games",
        planned.plan.len(),
        planned.rows_checked
    );
    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::parse_csv;

    const STATS_CSV: &str = include_str!("../tests/fixtures/stats_player_reg_2025.csv");
    const GAMES_CSV: &str = include_str!("../tests/fixtures/games.csv");

    fn roster() -> RosterIndex {
        let qb = |id: i64, name: &str| Quarterback {
            id,
            name: name.to_string(),
            nfl_team: "UNK".to_string(),
            season: 2025,
            squad_id: Some(1),
        };
        RosterIndex::new(&[
            qb(1, "Josh Allen"),
            qb(2, "Patrick Mahomes"),
            qb(3, "Jalen Hurts"),
            qb(4, "Joe Burrow"),
        ])
    }

    #[test]
    fn test_season_stats_match_either_name() {
        let rows: Vec<PlayerSeasonRow> = parse_csv(STATS_CSV).unwrap();
        let planned = plan_season_stats(2025, &rows, &roster());

        // Four QB rows, the RB is ignored
        assert_eq!(planned.rows_checked, 4);
        assert_eq!(planned.plan.len(), 3);

        let SyncWrite::SeasonTotals { qb_id, totals, .. } = &planned.plan.writes[0] else {
            panic!("expected season totals");
        };
        assert_eq!(*qb_id, 1);
        assert_eq!(totals.passing_yards, Some(3668));
        assert_eq!(totals.interceptions, Some(10));
        assert_eq!(totals.fumbles, Some(2));
        assert_eq!(totals.game_won, None);

        // Matched through player_display_name
        let ids: Vec<i64> = planned
            .plan
            .writes
            .iter()
            .map(SyncWrite::qb_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_wins_skip_ties_unplayed_and_other_seasons() {
        let games: Vec<ScheduleRow> = parse_csv(GAMES_CSV).unwrap();
        let planned = plan_wins(2025, &games, &roster());

        // Completed 2025 regular-season games: weeks 1, 2, 3
        assert_eq!(planned.rows_checked, 3);
        let win = |qb_id: i64, week: i32, prime_time: bool| SyncWrite::Win {
            qb_id,
            season: 2025,
            week,
            prime_time,
        };
        assert_eq!(planned.plan.writes, vec![win(1, 1, true), win(2, 2, false)]);
    }

    #[test]
    fn test_playoffs_credit_both_sides() {
        let games: Vec<ScheduleRow> = parse_csv(GAMES_CSV).unwrap();
        let planned = plan_playoffs(2025, &games, &roster());

        assert_eq!(planned.rows_checked, 2);
        let appearance = |qb_id: i64, round: PlayoffRound, won_super_bowl: bool| {
            SyncWrite::Playoff {
                qb_id,
                season: 2025,
                round,
                won_super_bowl,
            }
        };
        assert_eq!(
            planned.plan.writes,
            vec![
                appearance(1, PlayoffRound::Divisional, false),
                appearance(2, PlayoffRound::Divisional, false),
                appearance(3, PlayoffRound::SuperBowl, true),
                appearance(2, PlayoffRound::SuperBowl, false),
            ]
        );
    }

    #[test]
    fn test_playoff_round_codes() {
        assert_eq!(playoff_round("WC"), Some(PlayoffRound::WildCard));
        assert_eq!(playoff_round("CON"), Some(PlayoffRound::ConfChampionship));
        assert_eq!(playoff_round("REG"), None);
    }
}
