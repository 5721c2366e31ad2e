//! Local key-value storage backing the persisted blobs.
//!
//! Every blob (note collection, session flag, theme) lives under its own
//! stable key. Values are opaque strings; interpreting them is the caller's
//! business.
use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use log::{debug, error, trace};
use tempfile::NamedTempFile;

use crate::{KnError, Result};

/// Key holding the JSON array of notes in canonical order.
pub const NOTES_KEY: &str = "kinetic-notes";
/// Key holding the JSON boolean session flag.
pub const AUTH_KEY: &str = "kinetic-auth";
/// Key holding the raw theme preference string.
pub const THEME_KEY: &str = "theme";
/// Key holding the pending deletion between CLI invocations.
pub const PENDING_DELETE_KEY: &str = "kinetic-pending-delete";

/// A string-to-string store with the semantics of browser local storage.
pub trait KeyValueStore {
    /// Returns `None` when the key has never been written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key as a file inside one directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates the store, making sure `dir` exists.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                KnError::DirectoryError { path: dir.clone() }
            })?;
        }
        Ok(FileKeyValueStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            trace!("No value stored under {}", key);
            return Ok(None);
        }
        let value = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            KnError::Io(e)
        })?;
        Ok(Some(value))
    }

    /// Writes through a temporary file in the same directory and renames it
    /// into place, so a crash never leaves a half-written value.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            KnError::Io(e)
        })?;

        temp_file.write_all(value.as_bytes())?;
        temp_file.flush()?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            KnError::Io(e.error)
        })?;

        trace!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!("Removed {}", path.display());
        }
        Ok(())
    }
}

/// In-process store. Clones share the same map, so a reopened store sees
/// what an earlier one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `value` already stored under `key`.
    pub fn seeded(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// While set, every `set` and `remove` fails like a full storage quota.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` and `remove` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KnError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "storage quota exceeded",
            )));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| KnError::LockAcquisitionFailed {
                message: "Failed to acquire lock on memory store".to_string(),
            })
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.lock()?.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
