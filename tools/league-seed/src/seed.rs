//! Corrective re-seeding against any [`LeagueStore`]

use crate::data::{AwardsFile, RosterFile};
use anyhow::{Context, Result};
use league_store::{LeagueStore, NewQuarterback, NewSeasonBonus, NewSquad, StoreError};
use scoring_engine::BonusKind;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RosterReport {
    pub squads_removed: u64,
    pub squads_created: usize,
    pub quarterbacks_created: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AwardedBonus {
    pub name: String,
    pub bonus_type: BonusKind,
    pub note: Option<String>,
    pub points: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AwardsReport {
    pub cleared: u64,
    pub awarded: Vec<AwardedBonus>,

    /// Names with no quarterback in the season
    pub missing: Vec<String>,

    /// Awards a quarterback already holds for the season
    pub duplicates: Vec<AwardedBonus>,

    /// Points added per squad name
    pub points_by_squad: BTreeMap<String, f64>,
}

impl AwardsReport {
    pub fn total_points(&self) -> f64 {
        self.awarded.iter().map(|a| a.points).sum()
    }
}

/// Replace a season's squads and quarterbacks with the file's contents
pub async fn seed_rosters(store: &dyn LeagueStore, file: &RosterFile) -> Result<RosterReport> {
    let mut report = RosterReport {
        squads_removed: store
            .delete_season(file.season)
            .await
            .context("Failed to clear season")?,
        ..Default::default()
    };
    info!(
        "Cleared {} squads from season {}",
        report.squads_removed, file.season
    );

    for seed in &file.squads {
        let squad = store
            .create_squad(NewSquad {
                name: seed.name.clone(),
                owner: seed.owner.clone(),
                season: file.season,
            })
            .await
            .with_context(|| format!("Failed to create squad {}", seed.name))?;
        report.squads_created += 1;

        for qb in &seed.quarterbacks {
            store
                .create_quarterback(NewQuarterback {
                    name: qb.name.clone(),
                    nfl_team: qb.nfl_team.clone(),
                    season: file.season,
                    squad_id: Some(squad.id),
                })
                .await
                .with_context(|| format!("Failed to create quarterback {}", qb.name))?;
            report.quarterbacks_created += 1;
        }
        info!(
            "Seeded {} ({}) with {} quarterbacks",
            squad.name,
            squad.owner,
            seed.quarterbacks.len()
        );
    }

    Ok(report)
}

/// Clear the file's `replace` kinds, then award each bonus by quarterback name
pub async fn seed_awards(store: &dyn LeagueStore, file: &AwardsFile) -> Result<AwardsReport> {
    let mut report = AwardsReport::default();

    if !file.replace.is_empty() {
        report.cleared = store
            .delete_season_bonuses(file.season, &file.replace)
            .await
            .context("Failed to clear season bonuses")?;
        info!(
            "Cleared {} bonuses for season {}",
            report.cleared, file.season
        );
    }

    let quarterbacks = store.list_quarterbacks(file.season).await?;
    let by_name: HashMap<&str, _> = quarterbacks
        .iter()
        .map(|qb| (qb.name.as_str(), qb))
        .collect();
    let squad_names: HashMap<i64, String> = store
        .list_squads(file.season)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    for award in &file.awards {
        let Some(qb) = by_name.get(award.name.as_str()) else {
            warn!("{} not found in season {}", award.name, file.season);
            report.missing.push(award.name.clone());
            continue;
        };

        let bonus = NewSeasonBonus {
            qb_id: qb.id,
            season: file.season,
            bonus_type: award.bonus_type,
        };
        let entry = |points: f64| AwardedBonus {
            name: award.name.clone(),
            bonus_type: award.bonus_type,
            note: award.note.clone(),
            points,
        };

        match store.add_season_bonus(bonus).await {
            Ok(saved) => {
                if let Some(squad) = qb.squad_id.and_then(|id| squad_names.get(&id)) {
                    *report.points_by_squad.entry(squad.clone()).or_default() += saved.points;
                }
                report.awarded.push(entry(saved.points));
            }
            Err(StoreError::DuplicateEvent(_)) => {
                warn!(
                    "{} already holds {} for {}; skipped",
                    award.name, award.bonus_type, file.season
                );
                report.duplicates.push(entry(0.0));
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to award {} to {}", award.bonus_type, award.name)
                })
            }
        }
    }

    Ok(report)
}
