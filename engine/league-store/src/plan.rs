//! Batched event writes produced by external-data reconciliation
//!
//! A [`SyncPlan`] is built without touching storage. Each store applies the
//! whole plan in one commit and decides per write, against the row it
//! currently holds, whether to insert, update or skip.

use scoring_engine::{PlayoffRound, StatLine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncWrite {
    /// Season aggregate counters for the week 0 row; win flags are preserved
    SeasonTotals {
        qb_id: i64,
        season: i32,
        totals: StatLine,
    },

    /// A regular-season win credited to the starting QB
    Win {
        qb_id: i64,
        season: i32,
        week: i32,
        prime_time: bool,
    },

    /// A playoff round reached, optionally with the Super Bowl win
    Playoff {
        qb_id: i64,
        season: i32,
        round: PlayoffRound,
        won_super_bowl: bool,
    },
}

impl SyncWrite {
    pub fn qb_id(&self) -> i64 {
        match self {
            SyncWrite::SeasonTotals { qb_id, .. }
            | SyncWrite::Win { qb_id, .. }
            | SyncWrite::Playoff { qb_id, .. } => *qb_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub writes: Vec<SyncWrite>,
}

impl SyncPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: SyncWrite) {
        self.writes.push(write);
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Counts of what applying a plan did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl SyncOutcome {
    pub(crate) fn record<T>(&mut self, change: &RowChange<T>) {
        match change {
            RowChange::Insert(_) => self.created += 1,
            RowChange::Update(_) => self.updated += 1,
            RowChange::Skip => self.skipped += 1,
        }
    }

    /// Rows written, created or updated
    pub fn synced(&self) -> usize {
        self.created + self.updated
    }
}

/// What a single write does to the row for its natural key
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RowChange<T> {
    Insert(T),
    Update(T),
    Skip,
}

/// New counters over the existing row's win flags
pub(crate) fn season_totals_change(
    totals: &StatLine,
    existing: Option<&StatLine>,
) -> RowChange<StatLine> {
    match existing {
        Some(current) => RowChange::Update(StatLine {
            game_won: current.game_won,
            prime_time_win: current.prime_time_win,
            ..totals.clone()
        }),
        None => RowChange::Insert(StatLine {
            game_won: Some(false),
            prime_time_win: Some(false),
            ..totals.clone()
        }),
    }
}

/// Mark a week as won unless it already is; a missing week gets a win-only row
pub(crate) fn win_change(prime_time: bool, existing: Option<&StatLine>) -> RowChange<StatLine> {
    match existing {
        Some(current) if current.is_win() => RowChange::Skip,
        Some(current) => RowChange::Update(StatLine {
            game_won: Some(true),
            prime_time_win: Some(prime_time),
            ..current.clone()
        }),
        None => RowChange::Insert(StatLine {
            passing_yards: Some(0),
            rushing_yards: Some(0),
            passing_tds: Some(0),
            rushing_tds: Some(0),
            receiving_tds: Some(0),
            interceptions: Some(0),
            fumbles: Some(0),
            game_won: Some(true),
            prime_time_win: Some(prime_time),
        }),
    }
}

/// Existing appearances are only touched to record a Super Bowl win.
///
/// `existing` is the current `won_super_bowl` flag; the change carries the
/// flag to persist.
pub(crate) fn playoff_change(
    round: PlayoffRound,
    won_super_bowl: bool,
    existing: Option<bool>,
) -> RowChange<bool> {
    match existing {
        Some(false) if round == PlayoffRound::SuperBowl && won_super_bowl => {
            RowChange::Update(true)
        }
        Some(_) => RowChange::Skip,
        None => RowChange::Insert(won_super_bowl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_totals_keep_win_flags() {
        let totals = StatLine {
            passing_yards: Some(4000),
            ..Default::default()
        };
        let existing = StatLine {
            passing_yards: Some(10),
            game_won: Some(true),
            prime_time_win: Some(true),
            ..Default::default()
        };

        match season_totals_change(&totals, Some(&existing)) {
            RowChange::Update(line) => {
                assert_eq!(line.passing_yards, Some(4000));
                assert!(line.is_win());
                assert!(line.is_prime_time_win());
            }
            other => panic!("expected update, got {:?}", other),
        }

        match season_totals_change(&totals, None) {
            RowChange::Insert(line) => assert_eq!(line.game_won, Some(false)),
            other => panic!("expected insert, got {:?}", other),
        }
    }

    #[test]
    fn test_win_change() {
        let won = StatLine {
            game_won: Some(true),
            ..Default::default()
        };
        assert_eq!(win_change(true, Some(&won)), RowChange::Skip);

        let lost = StatLine {
            passing_tds: Some(2),
            ..Default::default()
        };
        match win_change(true, Some(&lost)) {
            RowChange::Update(line) => {
                assert_eq!(line.passing_tds, Some(2));
                assert!(line.is_prime_time_win());
            }
            other => panic!("expected update, got {:?}", other),
        }

        match win_change(false, None) {
            RowChange::Insert(line) => {
                assert!(line.is_win());
                assert!(!line.is_prime_time_win());
                assert_eq!(line.passing_yards, Some(0));
            }
            other => panic!("expected insert, got {:?}", other),
        }
    }

    #[test]
    fn test_playoff_change_only_upgrades_super_bowl_win() {
        let sb = PlayoffRound::SuperBowl;
        assert_eq!(
            playoff_change(sb, true, Some(false)),
            RowChange::Update(true)
        );
        assert_eq!(playoff_change(sb, true, Some(true)), RowChange::Skip);
        assert_eq!(playoff_change(sb, false, Some(true)), RowChange::Skip);

        let divisional = PlayoffRound::Divisional;
        assert_eq!(
            playoff_change(divisional, true, Some(false)),
            RowChange::Skip
        );
        assert_eq!(
            playoff_change(PlayoffRound::WildCard, false, None),
            RowChange::Insert(false)
        );
    }

    #[test]
    fn test_outcome_counts() {
        let mut outcome = SyncOutcome::default();
        outcome.record(&RowChange::Insert(()));
        outcome.record(&RowChange::Update(()));
        outcome.record::<()>(&RowChange::Skip);
        assert_eq!(
            outcome,
            SyncOutcome {
                created: 1,
                updated: 1,
                skipped: 1,
            }
        );
        assert_eq!(outcome.synced(), 2);
    }
}
