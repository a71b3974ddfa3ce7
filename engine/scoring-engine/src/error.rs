//! Error types for the scoring engine

use thiserror::Error;

/// Errors raised when parsing scoring enumerants from their wire codes.
///
/// Point calculation itself never fails; these only surface when a caller
/// asks for a strict parse (for example to reject an admin write).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Invalid bonus type: {0}")]
    UnknownBonusKind(String),

    #[error("Invalid playoff round: {0}")]
    UnknownPlayoffRound(String),
}
