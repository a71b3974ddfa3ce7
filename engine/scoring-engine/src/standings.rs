//! Quarterback and squad aggregation
//!
//! Every function here sums the `points` already persisted on each event.
//! Raw counters are never re-read; the calculator ran when the event was
//! written.

use crate::round_points;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

/// Number of quarterbacks that count toward a squad total
pub const TOP_CONTRIBUTORS: usize = 5;

/// Squad count the payout table is defined for
const PAYOUT_SQUADS: usize = 6;

/// Identity of a quarterback as seen by the aggregators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterbackRef {
    pub id: i64,
    pub name: String,
    pub nfl_team: String,
    pub squad_id: Option<i64>,
}

/// A quarterback together with the persisted points of each of its events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterbackLedger {
    pub quarterback: QuarterbackRef,
    pub weekly_points: Vec<f64>,
    pub bonus_points: Vec<f64>,
    pub playoff_points: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadRef {
    pub id: i64,
    pub name: String,
    pub owner: String,
}

/// A squad and its quarterbacks, in QB id order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadRoster {
    pub squad: SquadRef,
    pub quarterbacks: Vec<QuarterbackLedger>,
}

/// Per-category subtotals for one quarterback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub weekly_stats: f64,
    pub bonuses: f64,
    pub playoffs: f64,
    pub total: f64,
}

/// A quarterback with its season total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredQuarterback {
    pub qb_id: i64,
    pub name: String,
    pub nfl_team: String,
    pub squad_id: Option<i64>,
    pub total_points: f64,
}

/// One of a squad's counting quarterbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub qb_id: i64,
    pub name: String,
    pub nfl_team: String,
    pub total_points: f64,
}

/// A roster member with its position on the squad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub rank: usize,
    pub qb_id: i64,
    pub name: String,
    pub nfl_team: String,
    pub total_points: f64,
    #[serde(rename = "is_top_5")]
    pub is_top_five: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub rank: usize,
    pub squad_id: i64,
    pub squad_name: String,
    pub owner: String,
    pub total_points: f64,
    pub projected_payout: f64,
    pub top_qbs: Vec<Contributor>,
}

/// Rank-to-payout mapping for a six-squad season
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutTable {
    pub dues: f64,
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self { dues: 70.0 }
    }
}

impl PayoutTable {
    pub fn new(dues: f64) -> Self {
        Self { dues }
    }

    /// Projected payout for a 1-based rank; ranks past the sixth pay nothing
    pub fn payout(&self, rank: usize) -> f64 {
        match rank {
            1 => 6.0 * self.dues,
            2 => 0.0,
            3..=5 => -self.dues,
            6 => -3.0 * self.dues,
            _ => 0.0,
        }
    }
}

/// Season total for one quarterback, rounded once at the end
pub fn total_points(ledger: &QuarterbackLedger) -> f64 {
    let sum: f64 = ledger
        .weekly_points
        .iter()
        .chain(&ledger.bonus_points)
        .chain(&ledger.playoff_points)
        .sum();
    round_points(sum)
}

pub fn points_breakdown(ledger: &QuarterbackLedger) -> PointsBreakdown {
    PointsBreakdown {
        weekly_stats: round_points(ledger.weekly_points.iter().sum()),
        bonuses: round_points(ledger.bonus_points.iter().sum()),
        playoffs: round_points(ledger.playoff_points.iter().sum()),
        total: total_points(ledger),
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn scored(ledger: &QuarterbackLedger) -> ScoredQuarterback {
    let qb = &ledger.quarterback;
    ScoredQuarterback {
        qb_id: qb.id,
        name: qb.name.clone(),
        nfl_team: qb.nfl_team.clone(),
        squad_id: qb.squad_id,
        total_points: total_points(ledger),
    }
}

/// Roster members by total, highest first. Equal totals keep roster order.
fn ranked_roster(roster: &SquadRoster) -> Vec<Contributor> {
    let mut contributors: Vec<Contributor> = roster
        .quarterbacks
        .iter()
        .map(|ledger| Contributor {
            qb_id: ledger.quarterback.id,
            name: ledger.quarterback.name.clone(),
            nfl_team: ledger.quarterback.nfl_team.clone(),
            total_points: total_points(ledger),
        })
        .collect();
    contributors.sort_by(|a, b| descending(a.total_points, b.total_points));
    contributors
}

/// The `limit` highest-scoring quarterbacks of a squad
pub fn top_contributors(roster: &SquadRoster, limit: usize) -> Vec<Contributor> {
    let mut contributors = ranked_roster(roster);
    contributors.truncate(limit);
    contributors
}

/// Squad total under the best-five rule
pub fn squad_total(roster: &SquadRoster) -> f64 {
    let sum: f64 = top_contributors(roster, TOP_CONTRIBUTORS)
        .iter()
        .map(|c| c.total_points)
        .sum();
    round_points(sum)
}

/// Every roster member ranked 1..N, flagging the ones that count
pub fn squad_roster_ranking(roster: &SquadRoster) -> Vec<RosterEntry> {
    ranked_roster(roster)
        .into_iter()
        .enumerate()
        .map(|(idx, c)| RosterEntry {
            rank: idx + 1,
            qb_id: c.qb_id,
            name: c.name,
            nfl_team: c.nfl_team,
            total_points: c.total_points,
            is_top_five: idx < TOP_CONTRIBUTORS,
        })
        .collect()
}

/// Ranked league table with projected payouts.
///
/// Squads with equal totals keep the order they were passed in.
pub fn league_standings(rosters: &[SquadRoster], payouts: &PayoutTable) -> Vec<StandingEntry> {
    if !rosters.is_empty() && rosters.len() != PAYOUT_SQUADS {
        warn!(
            "Payout table assumes {} squads, season has {}; ranks past {} pay nothing",
            PAYOUT_SQUADS,
            rosters.len(),
            PAYOUT_SQUADS
        );
    }

    let mut totals: Vec<(&SquadRoster, f64)> =
        rosters.iter().map(|roster| (roster, squad_total(roster))).collect();
    totals.sort_by(|a, b| descending(a.1, b.1));

    totals
        .into_iter()
        .enumerate()
        .map(|(idx, (roster, total))| {
            let rank = idx + 1;
            StandingEntry {
                rank,
                squad_id: roster.squad.id,
                squad_name: roster.squad.name.clone(),
                owner: roster.squad.owner.clone(),
                total_points: total,
                projected_payout: payouts.payout(rank),
                top_qbs: top_contributors(roster, TOP_CONTRIBUTORS),
            }
        })
        .collect()
}

/// Lowest-scoring quarterback with a positive total; the first one wins ties
pub fn worst_quarterback(ledgers: &[QuarterbackLedger]) -> Option<ScoredQuarterback> {
    let mut worst: Option<ScoredQuarterback> = None;
    for candidate in ledgers.iter().map(scored) {
        if candidate.total_points <= 0.0 {
            continue;
        }
        match &worst {
            Some(current) if current.total_points <= candidate.total_points => {}
            _ => worst = Some(candidate),
        }
    }
    worst
}

/// All quarterbacks with totals, highest first
pub fn rank_quarterbacks(ledgers: &[QuarterbackLedger]) -> Vec<ScoredQuarterback> {
    let mut ranked: Vec<ScoredQuarterback> = ledgers.iter().map(scored).collect();
    ranked.sort_by(|a, b| descending(a.total_points, b.total_points));
    ranked
}
