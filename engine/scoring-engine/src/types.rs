use crate::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Season-level award kinds that carry a flat bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BonusKind {
    Mvp,
    MvpRunnerUp,
    #[serde(rename = "MVP_3RD")]
    Mvp3rd,
    #[serde(rename = "MVP_4TH")]
    Mvp4th,
    #[serde(rename = "MVP_5TH")]
    Mvp5th,
    RookieOfYear,
    ConfPow,
    ConfPom,
}

impl BonusKind {
    pub const ALL: [BonusKind; 8] = [
        BonusKind::Mvp,
        BonusKind::MvpRunnerUp,
        BonusKind::Mvp3rd,
        BonusKind::Mvp4th,
        BonusKind::Mvp5th,
        BonusKind::RookieOfYear,
        BonusKind::ConfPow,
        BonusKind::ConfPom,
    ];

    /// Wire/database code (e.g. "MVP_RUNNER_UP")
    pub fn code(&self) -> &'static str {
        match self {
            BonusKind::Mvp => "MVP",
            BonusKind::MvpRunnerUp => "MVP_RUNNER_UP",
            BonusKind::Mvp3rd => "MVP_3RD",
            BonusKind::Mvp4th => "MVP_4TH",
            BonusKind::Mvp5th => "MVP_5TH",
            BonusKind::RookieOfYear => "ROOKIE_OF_YEAR",
            BonusKind::ConfPow => "CONF_POW",
            BonusKind::ConfPom => "CONF_POM",
        }
    }
}

impl fmt::Display for BonusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BonusKind {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BonusKind::ALL
            .into_iter()
            .find(|kind| kind.code() == s)
            .ok_or_else(|| ScoringError::UnknownBonusKind(s.to_string()))
    }
}

/// Playoff rounds, in the order a team reaches them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayoffRound {
    WildCard,
    Divisional,
    ConfChampionship,
    SuperBowl,
}

impl PlayoffRound {
    pub const ALL: [PlayoffRound; 4] = [
        PlayoffRound::WildCard,
        PlayoffRound::Divisional,
        PlayoffRound::ConfChampionship,
        PlayoffRound::SuperBowl,
    ];

    /// Wire/database code (e.g. "CONF_CHAMPIONSHIP")
    pub fn code(&self) -> &'static str {
        match self {
            PlayoffRound::WildCard => "WILD_CARD",
            PlayoffRound::Divisional => "DIVISIONAL",
            PlayoffRound::ConfChampionship => "CONF_CHAMPIONSHIP",
            PlayoffRound::SuperBowl => "SUPER_BOWL",
        }
    }
}

impl fmt::Display for PlayoffRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PlayoffRound {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayoffRound::ALL
            .into_iter()
            .find(|round| round.code() == s)
            .ok_or_else(|| ScoringError::UnknownPlayoffRound(s.to_string()))
    }
}

/// Raw counting stats for one weekly stat line.
///
/// Every field is optional because persisted rows and admin payloads may omit
/// counters; absent values score as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    #[serde(default)]
    pub passing_yards: Option<i32>,
    #[serde(default)]
    pub rushing_yards: Option<i32>,
    #[serde(default)]
    pub passing_tds: Option<i32>,
    #[serde(default)]
    pub rushing_tds: Option<i32>,
    #[serde(default)]
    pub receiving_tds: Option<i32>,
    #[serde(default)]
    pub interceptions: Option<i32>,
    #[serde(default)]
    pub fumbles: Option<i32>,
    #[serde(default)]
    pub game_won: Option<bool>,
    #[serde(default)]
    pub prime_time_win: Option<bool>,
}

impl StatLine {
    /// Touchdowns of every kind, counted uniformly
    pub fn total_touchdowns(&self) -> f64 {
        [self.passing_tds, self.rushing_tds, self.receiving_tds]
            .iter()
            .map(|tds| f64::from(tds.unwrap_or(0)))
            .sum()
    }

    pub fn is_win(&self) -> bool {
        self.game_won.unwrap_or(false)
    }

    pub fn is_prime_time_win(&self) -> bool {
        self.prime_time_win.unwrap_or(false)
    }
}
