//! Core configuration.
//!
//! # Responsibility
//! - Name the storage keys and store file used by the note gateway.
//! - Resolve the store file location for FFI and CLI hosts.
//! - Carry the log level hosts start logging with.
//!
//! # Invariants
//! - Counter and notes live under two distinct keys.
//! - Defaults match the keys already written by installed app versions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Key holding the decimal identifier counter.
pub const DEFAULT_COUNTER_KEY: &str = "@NotesIndex";
/// Key holding the JSON note collection.
pub const DEFAULT_NOTES_KEY: &str = "@Notes";
/// File name of the SQLite device store.
pub const DEFAULT_DB_FILE_NAME: &str = "notepad_store.sqlite3";
/// Environment override for the device store location.
pub const DB_PATH_ENV: &str = "NOTEPAD_DB_PATH";

/// Runtime configuration for one notes store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotepadConfig {
    pub counter_key: String,
    pub notes_key: String,
    pub db_file_name: String,
    pub log_level: String,
}

impl Default for NotepadConfig {
    fn default() -> Self {
        Self {
            counter_key: DEFAULT_COUNTER_KEY.to_string(),
            notes_key: DEFAULT_NOTES_KEY.to_string(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: crate::logging::default_log_level().to_string(),
        }
    }
}

impl NotepadConfig {
    /// Resolves the store file path.
    ///
    /// `NOTEPAD_DB_PATH` wins when set and non-blank; otherwise the file is
    /// placed in `fallback_dir`.
    pub fn resolve_db_path(&self, fallback_dir: impl Into<PathBuf>) -> PathBuf {
        if let Ok(raw) = std::env::var(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        fallback_dir.into().join(&self.db_file_name)
    }

    /// Starts process logging at the configured `log_level`.
    ///
    /// # Errors
    /// Same as [`crate::logging::init_logging`]: unknown level, relative or
    /// non-UTF-8 directory, or logging already active with other settings.
    pub fn init_logging(&self, log_dir: &Path) -> Result<(), String> {
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log directory `{}` is not UTF-8", log_dir.display()))?;
        crate::logging::init_logging(&self.log_level, log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::{NotepadConfig, DEFAULT_COUNTER_KEY, DEFAULT_NOTES_KEY};

    #[test]
    fn defaults_use_distinct_legacy_keys() {
        let config = NotepadConfig::default();
        assert_eq!(config.counter_key, DEFAULT_COUNTER_KEY);
        assert_eq!(config.notes_key, DEFAULT_NOTES_KEY);
        assert_ne!(config.counter_key, config.notes_key);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: NotepadConfig =
            serde_json::from_str(r#"{ "notes_key": "@Custom" }"#).unwrap();
        assert_eq!(config.notes_key, "@Custom");
        assert_eq!(config.counter_key, DEFAULT_COUNTER_KEY);
    }
}
