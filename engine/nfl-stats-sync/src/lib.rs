//! nflverse reconciler
//!
//! Pulls the nflverse regular-season player totals and the game schedule,
//! resolves feed players to league quarterbacks by exact name, and writes
//! the resulting events through a [`league_store::LeagueStore`] in a single
//! commit per sync.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod reconcile;
pub mod service;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use fetcher::NflverseFetcher;
pub use service::{PlayoffsSummary, SeasonStatsSummary, StatsSync, WinsSummary};
