//! Storage backends for the route snapshot

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Trait for route snapshot storage
pub trait SnapshotStore {
    /// Get the stored snapshot, if any
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored snapshot
    fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Remove the stored snapshot
    fn clear(&self) -> Result<()>;

    /// Get storage backend name
    fn name(&self) -> &'static str;
}

/// Filesystem storage backend
///
/// Writes go to a temporary file next to the target and are renamed into
/// place, so a process starting concurrently never reads a partial snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "routes".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read route cache: {:?}", self.path))?;
        Ok(Some(bytes))
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create route cache directory")?;
        }

        let temp = self.temp_path();
        fs::write(&temp, bytes)
            .with_context(|| format!("Failed to write route cache: {:?}", temp))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("Failed to move route cache into place: {:?}", self.path))?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to delete route cache")?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

/// In-memory storage backend
///
/// Fast but non-persistent - the snapshot is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: RwLock<Option<Vec<u8>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| anyhow!("route cache lock poisoned"))?;
        Ok(snapshot.clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| anyhow!("route cache lock poisoned"))?;
        *snapshot = Some(bytes.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| anyhow!("route cache lock poisoned"))?;
        *snapshot = None;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_basic() {
        let store = MemorySnapshotStore::new();
        assert!(store.read().unwrap().is_none());

        store.write(b"routes").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some(&b"routes"[..]));

        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_file_store_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path().join("cache/nested/routes.json"));

        assert!(store.read().unwrap().is_none());
        store.write(b"{}").unwrap();
        assert_eq!(store.read().unwrap(), Some(b"{}".to_vec()));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_file_store_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("routes.json");

        // Create store and write a snapshot
        {
            let store = FileSnapshotStore::new(&path);
            store.write(b"first").unwrap();
            store.write(b"second").unwrap();
        }

        // New store instance (simulating restart)
        {
            let store = FileSnapshotStore::new(&path);
            assert_eq!(store.read().unwrap(), Some(b"second".to_vec()));
            store.clear().unwrap();
            assert!(store.read().unwrap().is_none());
        }
    }
}
