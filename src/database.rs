//! Data-access handle shared by every module page.
//!
//! The application keeps its runtime settings (language, update notice,
//! last update check, ...) in a flat key/value table. Here that table is a
//! JSON object on disk, loaded once and kept in memory behind a lock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::io::Write;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::config::DEFAULT_LANGUAGE;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to access data file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file {path:?} is not a JSON object of strings: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Values written to a freshly created data file.
pub fn default_settings() -> BTreeMap<String, String> {
    [
        ("language", DEFAULT_LANGUAGE.to_string()),
        ("show_update", "1".to_string()),
        ("last_update_check", "0".to_string()),
        ("version_update_check", String::new()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
    // Held from snapshot to rename so the newest snapshot is the one on disk.
    persist_lock: Mutex<()>,
}

impl Database {
    /// Opens the data file, seeding it with [`default_settings`] when it does
    /// not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            tracing::info!(path = %path.display(), "Creating data file with default settings");
            let db = Self {
                path,
                values: RwLock::new(default_settings()),
                persist_lock: Mutex::new(()),
            };
            db.persist()?;
            return Ok(db);
        }

        let text = std::fs::read_to_string(&path).map_err(|source| DatabaseError::Io {
            path: path.clone(),
            source,
        })?;
        let mut values: BTreeMap<String, String> =
            serde_json::from_str(&text).map_err(|source| DatabaseError::Json {
                path: path.clone(),
                source,
            })?;

        // Keys added by newer releases.
        for (k, v) in default_settings() {
            values.entry(k).or_insert(v);
        }

        tracing::debug!(path = %path.display(), keys = values.len(), "Loaded data file");
        Ok(Self {
            path,
            values: RwLock::new(values),
            persist_lock: Mutex::new(()),
        })
    }

    /// Handle with no backing file; [`persist`](Database::persist) is a no-op.
    pub fn in_memory(values: BTreeMap<String, String>) -> Self {
        Self {
            path: PathBuf::new(),
            values: RwLock::new(values),
            persist_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write().insert(key.into(), value.into());
    }

    /// Snapshot of every stored key/value pair, ordered by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Writes the current values back to the data file. A handle without a
    /// path is left alone.
    pub fn persist(&self) -> Result<(), DatabaseError> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }

        let _persisting = self.persist_lock.lock().unwrap_or_else(|e| e.into_inner());

        let body = {
            let values = self.read();
            serde_json::to_string_pretty(&*values).map_err(|source| DatabaseError::Json {
                path: self.path.clone(),
                source,
            })?
        };

        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent).map_err(|source| DatabaseError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
                parent
            }
            None => Path::new("."),
        };

        // Each call writes its own temp file next to the target and renames it
        // into place, so the data file is always a complete snapshot.
        let io_err = |source| DatabaseError::Io {
            path: self.path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(body.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    // A poisoned lock only means a writer panicked mid-insert; the map itself
    // is still usable.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.values.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.values.write().unwrap_or_else(|e| e.into_inner())
    }
}
