use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};

/// Kickoff hour (local) from which a win counts as prime time
pub const PRIME_TIME_HOUR: u32 = 17;

/// One row of `stats_player_reg_{season}.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSeasonRow {
    #[serde(default)]
    pub player_name: Option<String>,

    #[serde(default)]
    pub player_display_name: Option<String>,

    #[serde(default)]
    pub position: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub passing_yards: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub rushing_yards: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub passing_tds: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub rushing_tds: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub passing_interceptions: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub sack_fumbles_lost: Option<f64>,
}

impl PlayerSeasonRow {
    pub fn is_quarterback(&self) -> bool {
        self.position.as_deref() == Some("QB")
    }
}

/// One row of `games.csv`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleRow {
    pub season: i32,

    /// REG, WC, DIV, CON or SB
    pub game_type: String,

    pub week: i32,

    /// Local kickoff time, "HH:MM"
    #[serde(default)]
    pub gametime: Option<String>,

    pub home_team: String,
    pub away_team: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub home_score: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub away_score: Option<f64>,

    #[serde(default)]
    pub home_qb_name: Option<String>,

    #[serde(default)]
    pub away_qb_name: Option<String>,
}

/// Side of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl ScheduleRow {
    /// A game is complete once both scores are posted
    pub fn is_complete(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    /// Winning side; `None` for ties and unplayed games
    pub fn winner(&self) -> Option<Side> {
        let (home, away) = (self.home_score?, self.away_score?);
        if home > away {
            Some(Side::Home)
        } else if away > home {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn qb_name(&self, side: Side) -> Option<&str> {
        match side {
            Side::Home => self.home_qb_name.as_deref(),
            Side::Away => self.away_qb_name.as_deref(),
        }
    }

    /// Kickoff at or after 5 PM; unparseable times are not prime time
    pub fn is_prime_time(&self) -> bool {
        self.gametime
            .as_deref()
            .and_then(kickoff_hour)
            .map_or(false, |hour| hour >= PRIME_TIME_HOUR)
    }
}

fn kickoff_hour(gametime: &str) -> Option<u32> {
    let gametime = gametime.trim();
    NaiveTime::parse_from_str(gametime, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(gametime, "%H:%M:%S"))
        .map(|t| t.hour())
        .ok()
        .or_else(|| gametime.split(':').next()?.parse().ok())
}

/// Numeric CSV cell that may be empty or "NA"
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("NA") {
            None
        } else {
            value.parse::<f64>().ok()
        }
    }))
}

/// Whole-number counter from a numeric cell; missing values count as 0
pub fn counter(value: Option<f64>) -> i32 {
    value.map_or(0, |v| v.round() as i32)
}
