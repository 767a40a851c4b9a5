//! Progress store configuration.

use mission_core::DEFAULT_MAX_QUIZ_SCORE;
use serde::{Deserialize, Serialize};

/// Storage key the record lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "nasaSonicBoomProgress";

/// What `get` does with a record that fails to parse or validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Discard it and start over with a default record
    #[default]
    Reset,
    /// Return `CorruptState` and leave the stored data alone
    Surface,
}

/// Configuration for the progress store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage slot holding the record
    pub storage_key: String,
    /// Handling of corrupt records
    pub recovery: RecoveryPolicy,
    /// Highest score a quiz can award, used for accuracy
    pub max_quiz_score: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            recovery: RecoveryPolicy::Reset,
            max_quiz_score: DEFAULT_MAX_QUIZ_SCORE,
        }
    }
}
