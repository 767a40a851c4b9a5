//! JSON file storage implementation.
//!
//! Each slot is a `<key>.json` file under the storage root, with a small meta
//! marker (`meta/<key>.meta.json`, version + updated_at) next to it. Values
//! are written as-is; callers decide how to serialize.
//!
//! Both files are replaced by writing a temporary sibling and renaming it
//! over the target, so a concurrent reader sees the old or the new value,
//! never a truncated one.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use super::trait_::check_key;
use super::{Storage, StorageError, Result};
use tokio::fs;
use tracing::debug;

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the data and meta
    /// directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join("meta").join(format!("{}.meta.json", key))
    }

    async fn read_version(&self, key: &str) -> Result<u64> {
        let version = match fs::read_to_string(self.meta_path(key)).await {
            // A garbled marker only loses the conflict hint, not data.
            Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
                .ok()
                .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
                .unwrap_or(0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        Ok(version)
    }

    /// Read and increment the slot version, return the new version.
    async fn bump_version(&self, key: &str) -> Result<u64> {
        let version = self.read_version(key).await? + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        let json = serde_json::to_string_pretty(&meta)?;
        write_replace(&self.meta_path(key), json.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        read_optional(&self.slot_path(key)).await
    }

    async fn save(&mut self, key: &str, value: &str) -> Result<u64> {
        check_key(key)?;
        write_replace(&self.slot_path(key), value.as_bytes()).await?;
        let version = self.bump_version(key).await?;
        debug!(key, version, "slot written");
        Ok(version)
    }

    async fn remove(&mut self, key: &str) -> Result<()> {
        check_key(key)?;
        remove_optional(&self.slot_path(key)).await?;
        remove_optional(&self.meta_path(key)).await?;
        debug!(key, "slot removed");
        Ok(())
    }

    async fn version(&self, key: &str) -> Result<u64> {
        check_key(key)?;
        self.read_version(key).await
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace `path` with `contents` in one rename.
async fn write_replace(path: &Path, contents: &[u8]) -> Result<()> {
    static SEQ: AtomicU64 = AtomicU64::new(0);

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Err(StorageError::InvalidKey(path.display().to_string()));
    };
    let tmp = path.with_file_name(format!(
        ".{}.{}.{}.tmp",
        name,
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    ));

    fs::write(&tmp, contents).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

async fn remove_optional(path: &Path) -> Result<()> {
    fs::remove_file(path).await.or_else(|e| {
        if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        assert_eq!(storage.load("progress").await.unwrap(), None);
        assert!(!storage.contains("progress").await.unwrap());

        storage.save("progress", r#"{"totalXP":10}"#).await.unwrap();
        assert_eq!(
            storage.load("progress").await.unwrap().as_deref(),
            Some(r#"{"totalXP":10}"#)
        );
        assert!(dir.path().join("progress.json").exists());
        assert!(dir.path().join("meta").join("progress.meta.json").exists());
    }

    #[tokio::test]
    async fn test_version_increments_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        assert_eq!(storage.version("progress").await.unwrap(), 0);
        assert_eq!(storage.save("progress", "1").await.unwrap(), 1);
        assert_eq!(storage.save("progress", "2").await.unwrap(), 2);
        assert_eq!(storage.version("progress").await.unwrap(), 2);

        storage.remove("progress").await.unwrap();
        assert_eq!(storage.version("progress").await.unwrap(), 0);
        assert_eq!(storage.load("progress").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.save("progress", "1").await.unwrap();
        storage.save("progress", "2").await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .chain(std::fs::read_dir(dir.path().join("meta")).unwrap())
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reader_never_sees_partial_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = JsonStorage::new(dir.path()).await.unwrap();
        let reader = JsonStorage::new(dir.path()).await.unwrap();

        let short = "a".repeat(16);
        let long = "b".repeat(64 * 1024);
        writer.save("progress", &long).await.unwrap();

        let done = std::sync::atomic::AtomicBool::new(false);
        let write_side = async {
            for i in 0..200 {
                let value = if i % 2 == 0 { &short } else { &long };
                writer.save("progress", value).await.unwrap();
            }
            done.store(true, Ordering::SeqCst);
        };
        let read_side = async {
            let mut reads = 0;
            while !done.load(Ordering::SeqCst) {
                let value = reader.load("progress").await.unwrap().unwrap();
                assert!(value == short || value == long, "torn read of {} bytes", value.len());
                reads += 1;
            }
            reads
        };

        let ((), reads) = tokio::join!(write_side, read_side);
        assert!(reads > 0);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.remove("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn test_two_handles_share_slots() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = JsonStorage::new(dir.path()).await.unwrap();
        let second = JsonStorage::new(dir.path()).await.unwrap();

        first.save("progress", "shared").await.unwrap();
        assert_eq!(second.load("progress").await.unwrap().as_deref(), Some("shared"));
        assert_eq!(second.version("progress").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let err = storage.save("../escape", "x").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
