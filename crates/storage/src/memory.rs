//! In-memory storage.

use std::collections::HashMap;
use async_trait::async_trait;
use super::trait_::check_key;
use super::{Storage, StorageError, Result};

/// Process-local slot storage.
///
/// Used where nothing needs to outlive the process, and in tests. An
/// "unavailable" instance fails every call, like a disabled local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    versions: HashMap<String, u64>,
    unavailable: bool,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that rejects every operation.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.unavailable {
            return Err(StorageError::Unavailable("memory storage disabled".to_string()));
        }
        check_key(key)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        self.check(key)?;
        Ok(self.slots.get(key).cloned())
    }

    async fn save(&mut self, key: &str, value: &str) -> Result<u64> {
        self.check(key)?;
        let version = self.versions.get(key).copied().unwrap_or(0) + 1;
        self.versions.insert(key.to_string(), version);
        self.slots.insert(key.to_string(), value.to_string());
        Ok(version)
    }

    async fn remove(&mut self, key: &str) -> Result<()> {
        self.check(key)?;
        self.slots.remove(key);
        self.versions.remove(key);
        Ok(())
    }

    async fn version(&self, key: &str) -> Result<u64> {
        self.check(key)?;
        Ok(self.versions.get(key).copied().unwrap_or(0))
    }
}
