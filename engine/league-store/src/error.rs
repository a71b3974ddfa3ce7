//! Error types for the league store

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced squad or quarterback does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A create-only event already exists for its natural key
    #[error("Duplicate event: {0}")]
    DuplicateEvent(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A persisted value could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateEvent(msg.into())
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    pub fn quarterback_not_found(qb_id: i64) -> Self {
        Self::NotFound(format!("Quarterback {}", qb_id))
    }

    pub fn squad_not_found(squad_id: i64) -> Self {
        Self::NotFound(format!("Squad {}", squad_id))
    }
}
