//! Howell League HTTP API
//!
//! Warp routes over a [`league_store::LeagueStore`]: public standings, squad
//! and quarterback views computed by the scoring engine, plus admin writes
//! and nflverse sync triggers gated by an [`auth::AdminAuthorizer`].

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod rest_api;

pub use auth::{AdminAuthorizer, SharedSecretAuthorizer};
pub use config::ApiConfig;
pub use error::{ApiError, ErrorResponse};
pub use rest_api::create_routes;
