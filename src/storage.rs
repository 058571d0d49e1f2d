//! Storage
//!
//! Key-value persistence for JSON snapshots. Reads fail open: a missing or unreadable value
//! loads as an empty sequence. Writes report errors so callers can roll back.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while writing a snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The records could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the value would exceed the storage quota.
    #[error("storage quota exceeded writing {key:?}: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Key being written
        key: String,

        /// Bytes the store would hold after the write
        needed: usize,

        /// Quota in bytes
        limit: usize,
    },

    /// The backing file could not be written.
    #[error("failed to write snapshot: {0}")]
    Io(#[from] io::Error),
}

/// Key-value storage for serialized snapshots.
pub trait Storage {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value could not be stored.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory storage with an optional byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create unbounded in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create in-memory storage that holds at most `bytes` of keys and values.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            quota: Some(bytes),
        }
    }

    /// Change the byte quota; `None` removes it.
    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());

            let needed = self.used_bytes() - replaced + key.len() + value.len();

            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        self.entries.insert(key.to_string(), value);

        Ok(())
    }
}

/// Storage backed by one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open storage in `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory could not be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Directory holding the snapshot files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);

        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read snapshot");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        fs::write(self.path(key), value)?;

        Ok(())
    }
}

/// Load a sequence of records stored under `key`.
///
/// Missing and unparsable values load as an empty sequence.
pub fn load_records<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Vec<T> {
    let Some(raw) = storage.get(key) else {
        debug!(key, "no snapshot stored");
        return Vec::new();
    };

    match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable snapshot");
            Vec::new()
        }
    }
}

/// Serialize `records` as a JSON array and store it under `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if serialization or the write fails.
pub fn save_records<T: Serialize>(
    storage: &mut impl Storage,
    key: &str,
    records: &[T],
) -> Result<(), StorageError> {
    let value = serde_json::to_string(records)?;

    storage.set(key, value)
}
