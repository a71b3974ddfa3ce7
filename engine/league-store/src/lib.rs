//! League persistence
//!
//! Squads, quarterbacks and their scoring events behind the [`LeagueStore`]
//! trait, with a Postgres backend and an in-memory backend. Stores own the
//! recompute-on-write step: every event write runs the points calculator
//! before the row is saved.

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod plan;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryLeagueStore;
pub use models::{
    NewPlayoffAppearance, NewQuarterback, NewSeasonBonus, NewSquad, PlayoffAppearance, Quarterback,
    QuarterbackEvents, SeasonBonus, Squad, SquadWithRoster, WeeklyStat, WeeklyStatInput,
};
pub use pg::PgLeagueStore;
pub use plan::{SyncOutcome, SyncPlan, SyncWrite};
pub use store::LeagueStore;
