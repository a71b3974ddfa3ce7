//! Error types for the reconciler

use league_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// True when the failure came from the upstream feed rather than storage
    pub fn is_upstream(&self) -> bool {
        !matches!(self, SyncError::Store(_))
    }
}
