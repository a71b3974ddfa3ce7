use crate::types::{BonusKind, PlayoffRound};
use serde::{Deserialize, Serialize};

/// Point tables for the league (league rules section 6.2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Per-stat rates applied to a weekly stat line
    pub weekly: WeeklyRates,

    /// Flat values for season awards
    pub bonuses: BonusValues,

    /// Flat values for playoff appearances
    pub playoffs: PlayoffValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRates {
    /// Passing yards per point (25 yards = 1 point)
    pub passing_yards_per_point: f64,

    /// Rushing yards per point (10 yards = 1 point)
    pub rushing_yards_per_point: f64,

    /// Points per touchdown of any kind
    pub touchdown: f64,

    /// Points per interception (negative)
    pub interception: f64,

    /// Points per fumble (negative)
    pub fumble: f64,

    /// Points for a regular win
    pub win: f64,

    /// Points for a prime-time win; replaces `win`, never stacks with it
    pub prime_time_win: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusValues {
    pub mvp: f64,
    pub mvp_runner_up: f64,
    pub mvp_3rd: f64,
    pub mvp_4th: f64,
    pub mvp_5th: f64,
    pub rookie_of_year: f64,
    pub conf_player_of_week: f64,
    pub conf_player_of_month: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffValues {
    pub wild_card: f64,
    pub divisional: f64,
    pub conf_championship: f64,
    pub super_bowl: f64,

    /// Added on top of `super_bowl` for the winning QB
    pub super_bowl_win: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            weekly: WeeklyRates {
                passing_yards_per_point: 25.0,
                rushing_yards_per_point: 10.0,
                touchdown: 6.0,
                interception: -3.0,
                fumble: -3.0,
                win: 3.0,
                prime_time_win: 4.0,
            },
            bonuses: BonusValues {
                mvp: 50.0,
                mvp_runner_up: 40.0,
                mvp_3rd: 30.0,
                mvp_4th: 20.0,
                mvp_5th: 10.0,
                rookie_of_year: 30.0,
                conf_player_of_week: 10.0,
                conf_player_of_month: 20.0,
            },
            playoffs: PlayoffValues {
                wild_card: 3.0,
                divisional: 6.0,
                conf_championship: 10.0,
                super_bowl: 15.0,
                super_bowl_win: 25.0,
            },
        }
    }
}

impl BonusValues {
    pub fn value(&self, kind: BonusKind) -> f64 {
        match kind {
            BonusKind::Mvp => self.mvp,
            BonusKind::MvpRunnerUp => self.mvp_runner_up,
            BonusKind::Mvp3rd => self.mvp_3rd,
            BonusKind::Mvp4th => self.mvp_4th,
            BonusKind::Mvp5th => self.mvp_5th,
            BonusKind::RookieOfYear => self.rookie_of_year,
            BonusKind::ConfPow => self.conf_player_of_week,
            BonusKind::ConfPom => self.conf_player_of_month,
        }
    }
}

impl PlayoffValues {
    /// Appearance value for a round, excluding any Super Bowl win bonus
    pub fn appearance(&self, round: PlayoffRound) -> f64 {
        match round {
            PlayoffRound::WildCard => self.wild_card,
            PlayoffRound::Divisional => self.divisional,
            PlayoffRound::ConfChampionship => self.conf_championship,
            PlayoffRound::SuperBowl => self.super_bowl,
        }
    }
}
