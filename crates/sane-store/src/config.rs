use crate::layout::SaneLayout;
use crate::registry::Registry;
use crate::{fsync_dir, StoreError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

/// Persistence for the registry. Read once per invocation, written once
/// per invocation that changes it. No locking: concurrent writers race and
/// the last one wins.
pub trait ConfigStore {
    fn read(&self) -> Result<Registry, StoreError>;

    fn write(&self, registry: &Registry) -> Result<(), StoreError>;
}

/// Registry stored as JSON at `<home>/config.json`.
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(layout: &SaneLayout) -> Self {
        Self {
            path: layout.config_file(),
        }
    }
}

impl ConfigStore for JsonConfigStore {
    fn read(&self) -> Result<Registry, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::ConfigMissing(self.path.display().to_string()));
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write(&self, registry: &Registry) -> Result<(), StoreError> {
        let content =
            serde_json::to_string(registry).map_err(|source| StoreError::Serialization {
                path: self.path.display().to_string(),
                source,
            })?;

        let dir = self
            .path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        fsync_dir(&dir)?;

        debug!(
            "wrote registry ({} repos, {} aliases) to {}",
            registry.repos.len(),
            registry.aliases.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory store for tests and dry runs. Counts writes.
#[derive(Default)]
pub struct MemoryConfigStore {
    registry: Mutex<Registry>,
    writes: Mutex<usize>,
}

impl MemoryConfigStore {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Mutex::new(registry),
            writes: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> Registry {
        self.registry.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or_default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read(&self) -> Result<Registry, StoreError> {
        Ok(self.snapshot())
    }

    fn write(&self, registry: &Registry) -> Result<(), StoreError> {
        *self.registry.lock().map_err(|_| poisoned())? = registry.clone();
        *self.writes.lock().map_err(|_| poisoned())? += 1;
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(std::io::Error::other("memory store lock poisoned"))
}
