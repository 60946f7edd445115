//! Configuration management for the todo shell.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::persistence::STORAGE_KEY;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default location of the storage file
pub const DEFAULT_STORAGE_PATH: &str = "todo-storage.json";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "todo=info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Persistence slot configuration
    pub storage: StorageConfig,
    /// Log filter directive (trace, debug, info, warn, error, or per-target)
    pub log_level: String,
}

/// Persistence slot configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// JSON file holding the key-value slots
    pub path: PathBuf,
    /// Slot key the todo list is stored under
    pub key: String,
    /// Optional cap on the storage file's payload, in bytes
    pub quota_bytes: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                path: PathBuf::from(DEFAULT_STORAGE_PATH),
                key: STORAGE_KEY.to_string(),
                quota_bytes: None,
            },
            log_level: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `TODO_STORAGE_PATH` (default `todo-storage.json`)
    /// - `TODO_STORAGE_KEY` (default `todos:v1`)
    /// - `TODO_STORAGE_QUOTA_BYTES` (default unlimited; unparsable values are ignored)
    /// - `RUST_LOG` (default `todo=info`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            storage: StorageConfig {
                path: lookup("TODO_STORAGE_PATH")
                    .filter(|s| !s.trim().is_empty())
                    .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from),
                key: lookup("TODO_STORAGE_KEY")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| STORAGE_KEY.to_string()),
                quota_bytes: lookup("TODO_STORAGE_QUOTA_BYTES")
                    .and_then(|s| s.trim().parse().ok()),
            },
            log_level: lookup("RUST_LOG")
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Parse `log_level` into a filter, using [`DEFAULT_LOG_FILTER`] if it is invalid
    ///
    /// The parse error is returned alongside so the caller can report it once
    /// logging is up.
    #[must_use]
    pub fn log_filter(&self) -> (EnvFilter, Option<String>) {
        match EnvFilter::try_new(&self.log_level) {
            Ok(filter) => (filter, None),
            Err(error) => (
                EnvFilter::new(DEFAULT_LOG_FILTER),
                Some(format!("invalid log filter {:?}: {error}", self.log_level)),
            ),
        }
    }
}
