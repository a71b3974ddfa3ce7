use crate::round_points;
use crate::rules::ScoringRules;
use crate::types::{BonusKind, PlayoffRound, StatLine};
use tracing::debug;

/// Event point calculator.
///
/// Called by the store whenever an event is created or its raw fields change;
/// the result is persisted on the event row and is the only value
/// aggregation ever reads.
#[derive(Debug, Clone, Default)]
pub struct PointsCalculator {
    rules: ScoringRules,
}

impl PointsCalculator {
    /// Create a calculator over a custom rule table
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Points for one weekly stat line, rounded to 2 decimals
    pub fn weekly_points(&self, stat: &StatLine) -> f64 {
        let rates = &self.rules.weekly;
        let mut points = 0.0;

        points += f64::from(stat.passing_yards.unwrap_or(0)) / rates.passing_yards_per_point;
        points += f64::from(stat.rushing_yards.unwrap_or(0)) / rates.rushing_yards_per_point;
        points += stat.total_touchdowns() * rates.touchdown;
        points += f64::from(stat.interceptions.unwrap_or(0)) * rates.interception;
        points += f64::from(stat.fumbles.unwrap_or(0)) * rates.fumble;

        if stat.is_win() {
            points += if stat.is_prime_time_win() {
                rates.prime_time_win
            } else {
                rates.win
            };
        }

        round_points(points)
    }

    /// Flat value of a season award
    pub fn bonus_points(&self, kind: BonusKind) -> f64 {
        self.rules.bonuses.value(kind)
    }

    /// Flat value of a season award by wire code; unknown codes score 0
    pub fn bonus_points_for_code(&self, code: &str) -> f64 {
        match code.parse::<BonusKind>() {
            Ok(kind) => self.bonus_points(kind),
            Err(_) => {
                debug!("Unknown bonus kind '{}' scores 0", code);
                0.0
            }
        }
    }

    /// Value of one playoff appearance; the win bonus only applies at the Super Bowl
    pub fn playoff_points(&self, round: PlayoffRound, won_super_bowl: bool) -> f64 {
        let playoffs = &self.rules.playoffs;
        let mut points = playoffs.appearance(round);

        if round == PlayoffRound::SuperBowl && won_super_bowl {
            points += playoffs.super_bowl_win;
        }

        points
    }

    /// Value of one playoff appearance by wire code; unknown rounds score 0
    pub fn playoff_points_for_code(&self, code: &str, won_super_bowl: bool) -> f64 {
        match code.parse::<PlayoffRound>() {
            Ok(round) => self.playoff_points(round, won_super_bowl),
            Err(_) => {
                debug!("Unknown playoff round '{}' scores 0", code);
                0.0
            }
        }
    }
}
