//! Seed file formats

use anyhow::{Context, Result};
use scoring_engine::BonusKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every squad of one season with its quarterbacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    pub season: i32,
    pub squads: Vec<SquadSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadSeed {
    pub name: String,
    pub owner: String,
    pub quarterbacks: Vec<QuarterbackSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterbackSeed {
    pub name: String,
    pub nfl_team: String,
}

/// Season awards keyed by quarterback name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardsFile {
    pub season: i32,

    /// Bonus kinds cleared for the season before awarding
    #[serde(default)]
    pub replace: Vec<BonusKind>,

    pub awards: Vec<AwardSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardSeed {
    pub name: String,
    pub bonus_type: BonusKind,

    /// Free text such as the week or month of the award
    #[serde(default)]
    pub note: Option<String>,
}

/// Read and parse a JSON seed file
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_files_parse() {
        let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));

        let rosters: RosterFile = load(&manifest.join("data/rosters_2025.json")).unwrap();
        assert_eq!(rosters.season, 2025);
        assert_eq!(rosters.squads.len(), 6);
        assert!(rosters.squads.iter().all(|s| s.quarterbacks.len() == 8));

        let awards: AwardsFile = load(&manifest.join("data/awards_2025.json")).unwrap();
        assert_eq!(awards.replace, vec![BonusKind::ConfPow, BonusKind::ConfPom]);
        assert_eq!(awards.awards.len(), 21);
    }

    #[test]
    fn test_unknown_bonus_code_fails_to_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"season": 2025, "awards": [{{"name": "Josh Allen", "bonus_type": "MVP_6TH"}}]}}"#
        )
        .unwrap();

        let err = load::<AwardsFile>(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load::<RosterFile>(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
