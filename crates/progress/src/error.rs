//! Progress store errors.

use mission_storage::StorageError;

/// Result type for progress store operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors surfaced to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Stored data does not parse or breaks the record's consistency rules
    #[error("progress record under {key:?} is corrupt: {reason}")]
    CorruptState {
        /// Storage key of the record
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// The storage medium could not be read or written
    #[error("progress storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// The record could not be encoded
    #[error("failed to encode progress record: {0}")]
    Encode(#[from] serde_json::Error),

    /// Not a quiz mission of the catalog
    #[error("unknown quiz mission: {0}")]
    UnknownMission(String),

    /// Quiz score above the configured maximum
    #[error("score {score} for {mission} exceeds the maximum of {max}")]
    InvalidScore {
        /// Mission the score was for
        mission: String,
        /// Rejected score
        score: u32,
        /// Configured maximum
        max: u32,
    },
}

impl ProgressError {
    /// Whether this is a corrupt-record error.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, ProgressError::CorruptState { .. })
    }
}
