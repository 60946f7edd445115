//! File-backed key-value storage.
//!
//! A JSON object on disk maps slot keys to string values, the on-disk
//! counterpart of browser local storage. Every write rewrites the whole file
//! through a temporary file in the same directory, so readers never observe a
//! half-written document.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use todo_core::environment::{KeyValueStorage, StorageError};

type Slots = BTreeMap<String, String>;

/// [`KeyValueStorage`] persisted to a single JSON file
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Use the file at `path`; it is created on first write
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: None,
        }
    }

    /// Cap the total size of keys and values at `limit` bytes
    #[must_use]
    pub const fn with_quota(mut self, limit: usize) -> Self {
        self.quota = Some(limit);
        self
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<Slots, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Slots::new()),
            Err(error) => return Err(error.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Slots::new());
        }

        serde_json::from_str(&raw)
            .map_err(|error| StorageError::Corrupt(format!("{}: {error}", self.path.display())))
    }

    fn write_slots(&self, slots: &Slots) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let contents = serde_json::to_vec_pretty(slots)
            .map_err(|error| StorageError::Io(io::Error::other(error)))?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(&contents)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|error| error.error)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_slots()?.remove(key))
    }

    #[tracing::instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = match self.read_slots() {
            Ok(slots) => slots,
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(%reason, "Storage file unreadable, replacing it");
                Slots::new()
            },
            Err(error) => return Err(error),
        };

        slots.insert(key.to_string(), value.to_string());

        if let Some(limit) = self.quota {
            let size: usize = slots.iter().map(|(k, v)| k.len() + v.len()).sum();
            if size > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    limit,
                });
            }
        }

        self.write_slots(&slots)
    }
}
