//! Storage trait abstraction.

use async_trait::async_trait;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The storage medium cannot be used at all (disabled, full, ...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Key cannot be used as a slot name
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Keyed slot storage for serialized records.
///
/// Every slot carries a write version that increases on each `save`, so a
/// caller can tell whether someone else wrote the slot between its read and
/// its write. Backends do not lock; the last write wins.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the value stored under `key`.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`, returning the new write version.
    async fn save(&mut self, key: &str, value: &str) -> Result<u64>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&mut self, key: &str) -> Result<()>;

    /// Current write version of `key` (0 if never written or removed).
    async fn version(&self, key: &str) -> Result<u64>;

    /// Whether a value is stored under `key`.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.load(key).await?.is_some())
    }
}

/// Reject keys that cannot be used as slot names.
pub(crate) fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
