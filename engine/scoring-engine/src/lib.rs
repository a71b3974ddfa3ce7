//! Howell League scoring engine
//!
//! Pure scoring and standings computation for a QB-only fantasy league:
//!
//! - **rules**: the static point tables (weekly rates, season bonuses, playoff rounds)
//! - **calculator**: turns one scoring event into a point value at write time
//! - **standings**: sums persisted event points per quarterback, applies the
//!   best-five rule per squad and ranks the league with projected payouts
//!
//! Nothing in this crate performs I/O or holds state between calls.

pub mod calculator;
pub mod error;
pub mod rules;
pub mod standings;
pub mod types;

pub use calculator::PointsCalculator;
pub use error::ScoringError;
pub use rules::{BonusValues, PlayoffValues, ScoringRules, WeeklyRates};
pub use standings::{
    league_standings, points_breakdown, rank_quarterbacks, squad_roster_ranking, squad_total,
    top_contributors, total_points, worst_quarterback, Contributor, PayoutTable, PointsBreakdown,
    QuarterbackLedger, QuarterbackRef, RosterEntry, ScoredQuarterback, SquadRef, SquadRoster,
    StandingEntry, TOP_CONTRIBUTORS,
};
pub use types::{BonusKind, PlayoffRound, StatLine};

/// Round a point value to 2 decimal places (half away from zero).
///
/// Zero is always returned as positive zero, so empty sums serialise as `0.0`
/// and compare equal under `total_cmp`.
pub fn round_points(points: f64) -> f64 {
    let rounded = (points * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
