//! REST API endpoints for the league
//!
//! Public read endpoints serve standings, squads and quarterbacks. Admin
//! endpoints write scoring events and trigger nflverse syncs; they sit
//! behind an [`AdminAuthorizer`].

use crate::auth::{AdminAuthorizer, ADMIN_PASSWORD_HEADER};
use crate::config::ApiConfig;
use crate::error::{handle_rejection, reject, ApiError};
use league_store::{
    LeagueStore, NewPlayoffAppearance, NewSeasonBonus, Quarterback, QuarterbackEvents, Squad,
    SquadWithRoster, WeeklyStat, WeeklyStatInput,
};
use nfl_stats_sync::StatsSync;
use scoring_engine::{
    league_standings, points_breakdown, rank_quarterbacks, squad_roster_ranking, squad_total,
    worst_quarterback, BonusKind, PayoutTable, PlayoffRound, QuarterbackLedger, RosterEntry,
    SquadRoster, StandingEntry,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use warp::Filter;

/// Squad name reported for quarterbacks without a squad
pub const FREE_AGENT: &str = "Free Agent";

/// Request bodies larger than this are rejected
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Optional `?season=` parameter
#[derive(Debug, Default, Deserialize)]
pub struct SeasonQuery {
    pub season: Option<i32>,
}

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct StandingsResponse {
    pub season: i32,
    pub standings: Vec<StandingEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorstQuarterback {
    pub qb_id: i64,
    pub name: String,
    pub nfl_team: String,
    pub squad_name: String,
    pub total_points: f64,
}

#[derive(Serialize)]
pub struct WorstQuarterbackResponse {
    pub season: i32,
    pub worst_qb: Option<WorstQuarterback>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SquadSummary {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub season: i32,
    pub total_points: f64,
    pub qb_count: usize,
}

#[derive(Serialize)]
pub struct SquadsResponse {
    pub season: i32,
    pub squads: Vec<SquadSummary>,
}

#[derive(Serialize)]
pub struct RosterResponse {
    pub squad_id: i64,
    pub squad_name: String,
    pub owner: String,
    pub season: i32,
    pub roster: Vec<RosterEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuarterbackSummary {
    pub id: i64,
    pub name: String,
    pub nfl_team: String,
    pub squad_name: String,
    pub total_points: f64,
}

#[derive(Serialize)]
pub struct QuarterbacksResponse {
    pub season: i32,
    pub quarterbacks: Vec<QuarterbackSummary>,
}

/// A quarterback with every event and per-category subtotals
#[derive(Serialize)]
pub struct QuarterbackDetailResponse {
    pub qb_id: i64,
    pub name: String,
    pub nfl_team: String,
    pub squad_name: String,
    pub season: i32,
    pub total_points: f64,
    pub breakdown: Breakdown,
}

#[derive(Serialize)]
pub struct Breakdown {
    pub weekly_stats: WeeklyBreakdown,
    pub bonuses: BonusBreakdown,
    pub playoffs: PlayoffBreakdown,
}

#[derive(Serialize)]
pub struct WeeklyBreakdown {
    pub stats: Vec<WeeklyStat>,
    pub total: f64,
}

#[derive(Serialize)]
pub struct BonusBreakdown {
    pub awards: Vec<AwardEntry>,
    pub total: f64,
}

#[derive(Serialize)]
pub struct AwardEntry {
    #[serde(rename = "type")]
    pub bonus_type: BonusKind,
    pub points: f64,
}

#[derive(Serialize)]
pub struct PlayoffBreakdown {
    pub appearances: Vec<AppearanceEntry>,
    pub total: f64,
}

#[derive(Serialize)]
pub struct AppearanceEntry {
    pub round: PlayoffRound,
    pub won_super_bowl: bool,
    pub points: f64,
}

#[derive(Debug, Deserialize)]
pub struct PasswordVerify {
    pub password: String,
}

/// Admin bonus payload; the code is validated before it reaches the store
#[derive(Debug, Deserialize)]
pub struct SeasonBonusRequest {
    pub qb_id: i64,
    pub season: i32,
    pub bonus_type: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayoffAppearanceRequest {
    pub qb_id: i64,
    pub season: i32,
    pub round: String,
    #[serde(default)]
    pub won_super_bowl: bool,
}

#[derive(Serialize)]
pub struct AdminWriteResponse {
    pub message: String,
    pub qb_name: String,
    #[serde(flatten)]
    pub event: serde_json::Value,
    pub points: f64,
}

#[derive(Serialize)]
pub struct SyncResponse<T: Serialize> {
    pub message: String,
    #[serde(flatten)]
    pub summary: T,
}

fn ledgers(events: &[QuarterbackEvents]) -> Vec<QuarterbackLedger> {
    events.iter().map(QuarterbackEvents::ledger).collect()
}

fn squad_names(squads: &[Squad]) -> HashMap<i64, String> {
    squads.iter().map(|s| (s.id, s.name.clone())).collect()
}

fn squad_name_for(names: &HashMap<i64, String>, squad_id: Option<i64>) -> String {
    squad_id
        .and_then(|id| names.get(&id).cloned())
        .unwrap_or_else(|| FREE_AGENT.to_string())
}

fn quarterback_not_found(qb_id: i64) -> warp::Rejection {
    let message = format!("Quarterback {} not found", qb_id);
    reject(ApiError::not_found("QUARTERBACK_NOT_FOUND", message))
}

async fn require_quarterback(
    store: &dyn LeagueStore,
    qb_id: i64,
) -> Result<Quarterback, warp::Rejection> {
    store
        .get_quarterback(qb_id)
        .await
        .map_err(reject)?
        .ok_or_else(|| quarterback_not_found(qb_id))
}

/// League standings for a season
pub async fn get_standings(
    params: SeasonQuery,
    store: Arc<dyn LeagueStore>,
    config: Arc<ApiConfig>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let season = params.season.unwrap_or(config.league.current_season);
    let rosters: Vec<SquadRoster> = store
        .squad_rosters(season)
        .await
        .map_err(reject)?
        .iter()
        .map(SquadWithRoster::roster)
        .collect();

    let payouts = PayoutTable::new(config.league.dues_for(season));
    let standings = league_standings(&rosters, &payouts);

    Ok(warp::reply::json(&StandingsResponse { season, standings }))
}

/// Lowest-scoring quarterback with points above zero
pub async fn get_worst_qb(
    params: SeasonQuery,
    store: Arc<dyn LeagueStore>,
    config: Arc<ApiConfig>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let season = params.season.unwrap_or(config.league.current_season);
    let events = store.season_quarterback_events(season).await.map_err(reject)?;
    let names = squad_names(&store.list_squads(season).await.map_err(reject)?);

    let worst_qb = worst_quarterback(&ledgers(&events)).map(|qb| WorstQuarterback {
        qb_id: qb.qb_id,
        name: qb.name,
        nfl_team: qb.nfl_team,
        squad_name: squad_name_for(&names, qb.squad_id),
        total_points: qb.total_points,
    });

    Ok(warp::reply::json(&WorstQuarterbackResponse {
        season,
        worst_qb,
    }))
}

pub async fn get_squads(
    params: SeasonQuery,
    store: Arc<dyn LeagueStore>,
    config: Arc<ApiConfig>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let season = params.season.unwrap_or(config.league.current_season);
    let squads = store
        .squad_rosters(season)
        .await
        .map_err(reject)?
        .into_iter()
        .map(|entry| SquadSummary {
            total_points: squad_total(&entry.roster()),
            qb_count: entry.quarterbacks.len(),
            id: entry.squad.id,
            name: entry.squad.name,
            owner: entry.squad.owner,
            season: entry.squad.season,
        })
        .collect();

    Ok(warp::reply::json(&SquadsResponse { season, squads }))
}

/// A squad's quarterbacks ranked, with the counting five marked
pub async fn get_squad_roster(
    squad_id: i64,
    store: Arc<dyn LeagueStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let Some(entry) = store.squad_roster(squad_id).await.map_err(reject)? else {
        let message = format!("Squad {} not found", squad_id);
        return Err(reject(ApiError::not_found("SQUAD_NOT_FOUND", message)));
    };

    let roster = squad_roster_ranking(&entry.roster());
    Ok(warp::reply::json(&RosterResponse {
        squad_id: entry.squad.id,
        squad_name: entry.squad.name,
        owner: entry.squad.owner,
        season: entry.squad.season,
        roster,
    }))
}

pub async fn get_quarterbacks(
    params: SeasonQuery,
    store: Arc<dyn LeagueStore>,
    config: Arc<ApiConfig>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let season = params.season.unwrap_or(config.league.current_season);
    let events = store.season_quarterback_events(season).await.map_err(reject)?;
    let names = squad_names(&store.list_squads(season).await.map_err(reject)?);

    let quarterbacks = rank_quarterbacks(&ledgers(&events))
        .into_iter()
        .map(|qb| QuarterbackSummary {
            squad_name: squad_name_for(&names, qb.squad_id),
            id: qb.qb_id,
            name: qb.name,
            nfl_team: qb.nfl_team,
            total_points: qb.total_points,
        })
        .collect();

    Ok(warp::reply::json(&QuarterbacksResponse {
        season,
        quarterbacks,
    }))
}

pub async fn get_quarterback_detail(
    qb_id: i64,
    store: Arc<dyn LeagueStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let Some(events) = store.quarterback_events(qb_id).await.map_err(reject)? else {
        return Err(quarterback_not_found(qb_id));
    };

    let squad_name = match events.quarterback.squad_id {
        Some(squad_id) => store
            .get_squad(squad_id)
            .await
            .map_err(reject)?
            .map(|s| s.name)
            .unwrap_or_else(|| FREE_AGENT.to_string()),
        None => FREE_AGENT.to_string(),
    };

    let totals = points_breakdown(&events.ledger());
    let QuarterbackEvents {
        quarterback,
        weekly_stats,
        season_bonuses,
        playoff_appearances,
    } = events;

    let breakdown = Breakdown {
        weekly_stats: WeeklyBreakdown {
            stats: weekly_stats,
            total: totals.weekly_stats,
        },
        bonuses: BonusBreakdown {
            awards: season_bonuses
                .into_iter()
                .map(|b| AwardEntry {
                    bonus_type: b.bonus_type,
                    points: b.points,
                })
                .collect(),
            total: totals.bonuses,
        },
        playoffs: PlayoffBreakdown {
            appearances: playoff_appearances
                .into_iter()
                .map(|p| AppearanceEntry {
                    round: p.round,
                    won_super_bowl: p.won_super_bowl,
                    points: p.points,
                })
                .collect(),
            total: totals.playoffs,
        },
    };

    Ok(warp::reply::json(&QuarterbackDetailResponse {
        qb_id: quarterback.id,
        name: quarterback.name,
        nfl_team: quarterback.nfl_team,
        squad_name,
        season: quarterback.season,
        total_points: totals.total,
        breakdown,
    }))
}

pub async fn verify_admin_password(
    body: PasswordVerify,
    auth: Arc<dyn AdminAuthorizer>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth.authorize(Some(&body.password)).map_err(reject)?;
    Ok(warp::reply::json(&serde_json::json!({
        "success": true,
        "message": "Authentication successful"
    })))
}

/// Insert or replace a weekly stat line; points are recomputed by the store
pub async fn add_weekly_stat(
    input: WeeklyStatInput,
    store: Arc<dyn LeagueStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let quarterback = require_quarterback(store.as_ref(), input.qb_id).await?;
    if input.week < 0 {
        let message = format!("Invalid week: {}", input.week);
        return Err(reject(ApiError::bad_request("INVALID_WEEK", message)));
    }

    let stat = store.upsert_weekly_stat(input).await.map_err(reject)?;
    info!(
        "Saved week {} stats for {}: {} points",
        stat.week, quarterback.name, stat.points
    );

    Ok(warp::reply::json(&AdminWriteResponse {
        message: "Weekly stats saved successfully".to_string(),
        qb_name: quarterback.name,
        event: serde_json::json!({ "week": stat.week }),
        points: stat.points,
    }))
}

pub async fn add_season_bonus(
    request: SeasonBonusRequest,
    store: Arc<dyn LeagueStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let quarterback = require_quarterback(store.as_ref(), request.qb_id).await?;
    let bonus_type: BonusKind = request.bonus_type.parse().map_err(|_| {
        reject(ApiError::bad_request(
            "INVALID_BONUS_TYPE",
            format!("Invalid bonus type: {}", request.bonus_type),
        ))
    })?;

    let bonus = store
        .add_season_bonus(NewSeasonBonus {
            qb_id: request.qb_id,
            season: request.season,
            bonus_type,
        })
        .await
        .map_err(reject)?;
    info!("Added {} bonus for {}", bonus.bonus_type, quarterback.name);

    Ok(warp::reply::json(&AdminWriteResponse {
        message: "Bonus added successfully".to_string(),
        qb_name: quarterback.name,
        event: serde_json::json!({ "bonus_type": bonus.bonus_type }),
        points: bonus.points,
    }))
}

pub async fn add_playoff_appearance(
    request: PlayoffAppearanceRequest,
    store: Arc<dyn LeagueStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let quarterback = require_quarterback(store.as_ref(), request.qb_id).await?;
    let round: PlayoffRound = request.round.parse().map_err(|_| {
        reject(ApiError::bad_request(
            "INVALID_PLAYOFF_ROUND",
            format!("Invalid playoff round: {}", request.round),
        ))
    })?;

    let appearance = store
        .add_playoff_appearance(NewPlayoffAppearance {
            qb_id: request.qb_id,
            season: request.season,
            round,
            won_super_bowl: request.won_super_bowl,
        })
        .await
        .map_err(reject)?;
    info!(
        "Added {} appearance for {}",
        appearance.round, quarterback.name
    );

    Ok(warp::reply::json(&AdminWriteResponse {
        message: "Playoff appearance added successfully".to_string(),
        qb_name: quarterback.name,
        event: serde_json::json!({ "round": appearance.round }),
        points: appearance.points,
    }))
}

pub async fn sync_stats(
    params: SeasonQuery,
    sync: Arc<StatsSync>,
    config: Arc<ApiConfig>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let season = params.season.unwrap_or(config.league.current_season);
    let summary = sync.sync_season_stats(season).await.map_err(reject)?;
    Ok(warp::reply::json(&SyncResponse {
        message: format!("Successfully synced season stats for {}", season),
        summary,
    }))
}

pub async fn sync_wins(
    params: SeasonQuery,
    sync: Arc<StatsSync>,
    config: Arc<ApiConfig>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let season = params.season.unwrap_or(config.league.current_season);
    let summary = sync.sync_wins(season).await.map_err(reject)?;
    Ok(warp::reply::json(&SyncResponse {
        message: format!("Successfully synced QB wins for {}", season),
        summary,
    }))
}

pub async fn sync_playoffs(
    params: SeasonQuery,
    sync: Arc<StatsSync>,
    config: Arc<ApiConfig>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let season = params.season.unwrap_or(config.league.current_season);
    let summary = sync.sync_playoffs(season).await.map_err(reject)?;
    Ok(warp::reply::json(&SyncResponse {
        message: format!("Successfully synced playoff appearances for {}", season),
        summary,
    }))
}

/// Passes when the request carries an accepted admin password
fn admin_gate(
    auth: Arc<dyn AdminAuthorizer>,
) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(ADMIN_PASSWORD_HEADER)
        .and_then(move |password: Option<String>| {
            let auth = auth.clone();
            async move { auth.authorize(password.as_deref()).map_err(reject) }
        })
        .untuple_one()
}

fn json_body<T: serde::de::DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

pub fn create_routes(
    store: Arc<dyn LeagueStore>,
    sync: Arc<StatsSync>,
    auth: Arc<dyn AdminAuthorizer>,
    config: Arc<ApiConfig>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let cors_origins = config.server.cors_origins.clone();

    let store_filter = warp::any().map(move || store.clone());
    let sync_filter = warp::any().map(move || sync.clone());
    let auth_filter = warp::any().map({
        let auth = auth.clone();
        move || auth.clone()
    });
    let config_filter = warp::any().map(move || config.clone());

    // Welcome endpoint
    let root = warp::path::end().and(warp::get()).map(|| {
        warp::reply::json(&WelcomeResponse {
            message: "Welcome to the Howell League API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    });

    // Standings endpoints
    let standings = warp::path("api")
        .and(warp::path("standings"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<SeasonQuery>())
        .and(store_filter.clone())
        .and(config_filter.clone())
        .and_then(get_standings);

    let worst_qb = warp::path("api")
        .and(warp::path("standings"))
        .and(warp::path("worst-qb"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<SeasonQuery>())
        .and(store_filter.clone())
        .and(config_filter.clone())
        .and_then(get_worst_qb);

    // Squad endpoints
    let squads = warp::path("api")
        .and(warp::path("squads"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<SeasonQuery>())
        .and(store_filter.clone())
        .and(config_filter.clone())
        .and_then(get_squads);

    let squad_roster = warp::path("api")
        .and(warp::path("squads"))
        .and(warp::path::param::<i64>())
        .and(warp::path("roster"))
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_squad_roster);

    // Quarterback endpoints
    let quarterbacks = warp::path("api")
        .and(warp::path("quarterbacks"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<SeasonQuery>())
        .and(store_filter.clone())
        .and(config_filter.clone())
        .and_then(get_quarterbacks);

    let quarterback_detail = warp::path("api")
        .and(warp::path("quarterbacks"))
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_quarterback_detail);

    // Admin endpoints
    let admin = warp::path("api").and(warp::path("admin"));

    let verify_password = admin
        .and(warp::path("verify-password"))
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<PasswordVerify>())
        .and(auth_filter.clone())
        .and_then(verify_admin_password);

    let weekly_stats = admin
        .and(warp::path("weekly-stats"))
        .and(warp::path::end())
        .and(warp::post())
        .and(admin_gate(auth.clone()))
        .and(json_body::<WeeklyStatInput>())
        .and(store_filter.clone())
        .and_then(add_weekly_stat);

    let bonuses = admin
        .and(warp::path("bonuses"))
        .and(warp::path::end())
        .and(warp::post())
        .and(admin_gate(auth.clone()))
        .and(json_body::<SeasonBonusRequest>())
        .and(store_filter.clone())
        .and_then(add_season_bonus);

    let playoffs = admin
        .and(warp::path("playoffs"))
        .and(warp::path::end())
        .and(warp::post())
        .and(admin_gate(auth.clone()))
        .and(json_body::<PlayoffAppearanceRequest>())
        .and(store_filter.clone())
        .and_then(add_playoff_appearance);

    let sync_stats_route = admin
        .and(warp::path("sync-stats"))
        .and(warp::path::end())
        .and(warp::post())
        .and(admin_gate(auth.clone()))
        .and(warp::query::<SeasonQuery>())
        .and(sync_filter.clone())
        .and(config_filter.clone())
        .and_then(sync_stats);

    let sync_wins_route = admin
        .and(warp::path("sync-wins"))
        .and(warp::path::end())
        .and(warp::post())
        .and(admin_gate(auth.clone()))
        .and(warp::query::<SeasonQuery>())
        .and(sync_filter.clone())
        .and(config_filter.clone())
        .and_then(sync_wins);

    let sync_playoffs_route = admin
        .and(warp::path("sync-playoffs"))
        .and(warp::path::end())
        .and(warp::post())
        .and(admin_gate(auth))
        .and(warp::query::<SeasonQuery>())
        .and(sync_filter)
        .and(config_filter)
        .and_then(sync_playoffs);

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            warp::reply::json(&serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        });

    let cors = warp::cors()
        .allow_headers(vec!["content-type", ADMIN_PASSWORD_HEADER])
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);
    let cors = if cors_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        cors.allow_origins(cors_origins.iter().map(String::as_str))
    };

    // Combine all routes
    root.or(standings)
        .or(worst_qb)
        .or(squads)
        .or(squad_roster)
        .or(quarterbacks)
        .or(quarterback_detail)
        .or(verify_password)
        .or(weekly_stats)
        .or(bonuses)
        .or(playoffs)
        .or(sync_stats_route)
        .or(sync_wins_route)
        .or(sync_playoffs_route)
        .or(health)
        .recover(handle_rejection)
        .with(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SharedSecretAuthorizer;
    use league_store::{MemoryLeagueStore, NewQuarterback, NewSquad};
    use nfl_stats_sync::config::FeedConfig;
    use nfl_stats_sync::NflverseFetcher;
    use scoring_engine::StatLine;
    use serde_json::Value;
    use warp::http::StatusCode;

    const GAMES_CSV: &str = include_str!("../../nfl-stats-sync/tests/fixtures/games.csv");
    const PASSWORD: &str = "letmein";

    struct League {
        store: Arc<MemoryLeagueStore>,
        team_one: i64,
        allen: i64,
        hurts: i64,
    }

    async fn add_qb(
        store: &MemoryLeagueStore,
        name: &str,
        team: &str,
        squad_id: Option<i64>,
        week1: StatLine,
    ) -> i64 {
        let qb = store
            .create_quarterback(NewQuarterback {
                name: name.into(),
                nfl_team: team.into(),
                season: 2025,
                squad_id,
            })
            .await
            .unwrap();
        store
            .upsert_weekly_stat(WeeklyStatInput {
                qb_id: qb.id,
                week: 1,
                season: 2025,
                stats: week1,
            })
            .await
            .unwrap();
        qb.id
    }

    async fn add_squad(store: &MemoryLeagueStore, name: &str, owner: &str) -> i64 {
        store
            .create_squad(NewSquad {
                name: name.into(),
                owner: owner.into(),
                season: 2025,
            })
            .await
            .unwrap()
            .id
    }

    async fn league() -> League {
        let store = Arc::new(MemoryLeagueStore::new());
        let team_one = add_squad(&store, "Team One", "Owner One").await;
        let team_two = add_squad(&store, "Team Two", "Owner Two").await;

        // 12 + 4 + 18 + 3 = 37.0
        let allen = add_qb(
            &store,
            "Josh Allen",
            "BUF",
            Some(team_one),
            StatLine {
                passing_yards: Some(300),
                rushing_yards: Some(40),
                passing_tds: Some(3),
                game_won: Some(true),
                ..Default::default()
            },
        )
        .await;
        // 10 + 12 - 3 = 19.0
        add_qb(
            &store,
            "Patrick Mahomes",
            "KC",
            Some(team_one),
            StatLine {
                passing_yards: Some(250),
                passing_tds: Some(2),
                interceptions: Some(1),
                ..Default::default()
            },
        )
        .await;
        // 8 - 6 = 2.0
        add_qb(
            &store,
            "Joe Burrow",
            "CIN",
            Some(team_two),
            StatLine {
                passing_yards: Some(200),
                interceptions: Some(2),
                ..Default::default()
            },
        )
        .await;
        // 1.5, unowned
        let scrambles = StatLine {
            rushing_yards: Some(15),
            ..Default::default()
        };
        let hurts = add_qb(&store, "Jalen Hurts", "PHI", None, scrambles).await;

        League {
            store,
            team_one,
            allen,
            hurts,
        }
    }

    fn feeds(base_url: &str) -> FeedConfig {
        FeedConfig {
            stats_base_url: base_url.to_string(),
            schedules_url: format!("{}/games.csv", base_url),
            timeout_secs: 5,
        }
    }

    fn api(
        store: Arc<MemoryLeagueStore>,
        feeds: FeedConfig,
        password: Option<&str>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static {
        let store: Arc<dyn LeagueStore> = store;
        let fetcher = NflverseFetcher::new(feeds).unwrap();
        let sync = Arc::new(StatsSync::new(fetcher, store.clone()));
        let secret = password.map(str::to_string);
        let auth: Arc<dyn AdminAuthorizer> = Arc::new(SharedSecretAuthorizer::new(secret));
        create_routes(store, sync, auth, Arc::new(ApiConfig::default()))
    }

    fn offline(
        store: Arc<MemoryLeagueStore>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static {
        api(store, feeds("http://127.0.0.1:9"), Some(PASSWORD))
    }

    fn get(path: &str) -> warp::test::RequestBuilder {
        warp::test::request().method("GET").path(path)
    }

    fn body<B: AsRef<[u8]>>(response: &warp::http::Response<B>) -> Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let routes = offline(league().await.store);

        let response = get("/").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body(&response)["message"],
            "Welcome to the Howell League API"
        );

        let response = get("/health").reply(&routes).await;
        assert_eq!(body(&response)["status"], "healthy");
    }

    #[tokio::test]
    async fn test_standings() {
        let league = league().await;
        let routes = offline(league.store.clone());

        let response = get("/api/standings?season=2025").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body(&response);
        assert_eq!(json["season"], 2025);
        let standings = json["standings"].as_array().unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0]["squad_id"], league.team_one);
        assert_eq!(standings[0]["total_points"], 56.0);
        assert_eq!(standings[0]["projected_payout"], 420.0);
        assert_eq!(standings[0]["top_qbs"][0]["name"], "Josh Allen");
        assert_eq!(standings[1]["total_points"], 2.0);
        assert_eq!(standings[1]["projected_payout"], 0.0);
    }

    #[tokio::test]
    async fn test_standings_default_season_and_empty_season() {
        let routes = offline(league().await.store);

        let response = get("/api/standings").reply(&routes).await;
        assert_eq!(body(&response)["standings"].as_array().unwrap().len(), 2);

        let response = get("/api/standings?season=1999").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(&response)["standings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_worst_qb_includes_free_agents() {
        let league = league().await;
        let routes = offline(league.store.clone());

        let response = get("/api/standings/worst-qb").reply(&routes).await;
        let json = body(&response);
        assert_eq!(json["worst_qb"]["qb_id"], league.hurts);
        assert_eq!(json["worst_qb"]["squad_name"], FREE_AGENT);
        assert_eq!(json["worst_qb"]["total_points"], 1.5);

        let response = get("/api/standings/worst-qb?season=1999")
            .reply(&routes)
            .await;
        assert!(body(&response)["worst_qb"].is_null());
    }

    #[tokio::test]
    async fn test_squads_and_roster() {
        let league = league().await;
        let routes = offline(league.store.clone());

        let response = get("/api/squads").reply(&routes).await;
        let json = body(&response);
        assert_eq!(json["squads"][0]["qb_count"], 2);
        assert_eq!(json["squads"][0]["total_points"], 56.0);

        let path = format!("/api/squads/{}/roster", league.team_one);
        let response = get(&path).reply(&routes).await;
        let json = body(&response);
        assert_eq!(json["squad_name"], "Team One");
        assert_eq!(json["roster"][0]["rank"], 1);
        assert_eq!(json["roster"][0]["is_top_5"], true);
        assert_eq!(json["roster"][1]["name"], "Patrick Mahomes");

        let response = get("/api/squads/9999/roster").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(&response)["error"]["code"], "SQUAD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_quarterbacks_sorted_with_squad_names() {
        let routes = offline(league().await.store);

        let response = get("/api/quarterbacks").reply(&routes).await;
        let json = body(&response);
        let names: Vec<&str> = json["quarterbacks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["Josh Allen", "Patrick Mahomes", "Joe Burrow", "Jalen Hurts"]
        );
        assert_eq!(json["quarterbacks"][0]["squad_name"], "Team One");
        assert_eq!(json["quarterbacks"][3]["squad_name"], FREE_AGENT);
    }

    #[tokio::test]
    async fn test_quarterback_detail_breakdown() {
        let league = league().await;
        league
            .store
            .add_season_bonus(NewSeasonBonus {
                qb_id: league.allen,
                season: 2025,
                bonus_type: BonusKind::Mvp,
            })
            .await
            .unwrap();
        let routes = offline(league.store.clone());

        let path = format!("/api/quarterbacks/{}", league.allen);
        let response = get(&path).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body(&response);
        assert_eq!(json["squad_name"], "Team One");
        assert_eq!(json["total_points"], 87.0);
        assert_eq!(json["breakdown"]["weekly_stats"]["total"], 37.0);
        assert_eq!(json["breakdown"]["weekly_stats"]["stats"][0]["week"], 1);
        assert_eq!(json["breakdown"]["bonuses"]["awards"][0]["type"], "MVP");
        assert_eq!(json["breakdown"]["bonuses"]["total"], 50.0);
        assert_eq!(json["breakdown"]["playoffs"]["total"], 0.0);

        let response = get("/api/quarterbacks/9999").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(&response)["error"]["code"], "QUARTERBACK_NOT_FOUND");
        assert!(body(&response)["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_verify_password() {
        let routes = offline(league().await.store);

        let response = warp::test::request()
            .method("POST")
            .path("/api/admin/verify-password")
            .json(&serde_json::json!({ "password": PASSWORD }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["success"], true);

        let response = warp::test::request()
            .method("POST")
            .path("/api/admin/verify-password")
            .json(&serde_json::json!({ "password": "nope" }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_without_configured_secret() {
        let routes = api(league().await.store, feeds("http://127.0.0.1:9"), None);

        let response = warp::test::request()
            .method("POST")
            .path("/api/admin/verify-password")
            .json(&serde_json::json!({ "password": "anything" }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&response)["error"]["code"], "ADMIN_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_admin_writes_require_password() {
        let league = league().await;
        let routes = offline(league.store.clone());

        let response = warp::test::request()
            .method("POST")
            .path("/api/admin/bonuses")
            .json(&serde_json::json!({
                "qb_id": league.allen,
                "season": 2025,
                "bonus_type": "MVP"
            }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let events = league
            .store
            .quarterback_events(league.allen)
            .await
            .unwrap()
            .unwrap();
        assert!(events.season_bonuses.is_empty());
    }

    #[tokio::test]
    async fn test_weekly_stat_upsert_recomputes() {
        let league = league().await;
        let routes = offline(league.store.clone());

        let response = warp::test::request()
            .method("POST")
            .path("/api/admin/weekly-stats")
            .header(ADMIN_PASSWORD_HEADER, PASSWORD)
            .json(&serde_json::json!({
                "qb_id": league.allen,
                "week": 1,
                "season": 2025,
                "passing_yards": 100,
                "game_won": true,
                "prime_time_win": true
            }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body(&response);
        assert_eq!(json["qb_name"], "Josh Allen");
        assert_eq!(json["week"], 1);
        assert_eq!(json["points"], 8.0);

        let events = league
            .store
            .quarterback_events(league.allen)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(events.weekly_stats.len(), 1);
        assert_eq!(events.weekly_stats[0].points, 8.0);
    }

    #[tokio::test]
    async fn test_bonus_validation_and_duplicates() {
        let league = league().await;
        let routes = offline(league.store.clone());

        let post = |payload: Value| {
            warp::test::request()
                .method("POST")
                .path("/api/admin/bonuses")
                .header(ADMIN_PASSWORD_HEADER, PASSWORD)
                .json(&payload)
        };

        let runner_up = serde_json::json!({
            "qb_id": league.allen,
            "season": 2025,
            "bonus_type": "MVP_RUNNER_UP"
        });
        let response = post(runner_up.clone()).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["points"], 40.0);
        assert_eq!(body(&response)["bonus_type"], "MVP_RUNNER_UP");

        let response = post(runner_up).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response)["error"]["code"], "DUPLICATE_EVENT");

        let sixth = serde_json::json!({
            "qb_id": league.allen,
            "season": 2025,
            "bonus_type": "MVP_6TH"
        });
        let response = post(sixth).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response)["error"]["code"], "INVALID_BONUS_TYPE");

        let unknown_qb = serde_json::json!({
            "qb_id": 9999,
            "season": 2025,
            "bonus_type": "MVP"
        });
        let response = post(unknown_qb).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_playoff_appearance() {
        let league = league().await;
        let routes = offline(league.store.clone());

        let post = |payload: Value| {
            warp::test::request()
                .method("POST")
                .path("/api/admin/playoffs")
                .header(ADMIN_PASSWORD_HEADER, PASSWORD)
                .json(&payload)
        };

        let won = serde_json::json!({
            "qb_id": league.hurts,
            "season": 2025,
            "round": "SUPER_BOWL",
            "won_super_bowl": true
        });
        let response = post(won).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["points"], 40.0);

        let again = serde_json::json!({
            "qb_id": league.hurts,
            "season": 2025,
            "round": "SUPER_BOWL"
        });
        let response = post(again).reply(&routes).await;
        assert_eq!(body(&response)["error"]["code"], "DUPLICATE_EVENT");

        let pro_bowl = serde_json::json!({
            "qb_id": league.hurts,
            "season": 2025,
            "round": "PRO_BOWL"
        });
        let response = post(pro_bowl).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response)["error"]["code"], "INVALID_PLAYOFF_ROUND");
    }

    #[tokio::test]
    async fn test_sync_wins_endpoint() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/games.csv")
            .with_status(200)
            .with_body(GAMES_CSV)
            .create_async()
            .await;
        let league = league().await;
        let routes = api(league.store.clone(), feeds(&server.url()), Some(PASSWORD));

        let response = warp::test::request()
            .method("POST")
            .path("/api/admin/sync-wins?season=2025")
            .header(ADMIN_PASSWORD_HEADER, PASSWORD)
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        // Allen's week 1 is already a win; Mahomes gets a new week 2 row
        let json = body(&response);
        assert_eq!(json["games_checked"], 3);
        assert_eq!(json["total_wins_synced"], 1);
        assert_eq!(json["created"], 1);
        assert!(json["message"].as_str().unwrap().contains("2025"));
    }

    #[tokio::test]
    async fn test_sync_upstream_failure_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/games.csv")
            .with_status(500)
            .create_async()
            .await;
        let routes = api(league().await.store, feeds(&server.url()), Some(PASSWORD));

        let response = warp::test::request()
            .method("POST")
            .path("/api/admin/sync-playoffs")
            .header(ADMIN_PASSWORD_HEADER, PASSWORD)
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body(&response)["error"]["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_trailing_slash_paths() {
        let league = league().await;
        let routes = offline(league.store.clone());

        let response = get("/api/standings/").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["standings"].as_array().unwrap().len(), 2);

        let path = format!("/api/squads/{}/roster/", league.team_one);
        let response = get(&path).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response)["squad_name"], "Team One");

        let response = get("/api/quarterbacks/?season=2025").reply(&routes).await;
        assert_eq!(body(&response)["quarterbacks"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let routes = offline(league().await.store);
        let response = get("/api/nope").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
