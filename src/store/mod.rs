//! Persistence of the last chosen interval.
//!
//! The store is a tiny key-value collaborator: it remembers the interval
//! in hours and hands back whatever was saved. Validation and the
//! default-of-one-hour policy live in [`Interval::from_stored`].

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::types::Interval;

pub use self::error::StoreError;

/// Directory under the home directory that holds the settings file.
const SETTINGS_DIR: &str = ".standing-desk-timer";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.json";

/// Key-value persistence for the interval.
pub trait IntervalStore: Send {
    /// Returns the stored interval in hours, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get_stored_interval(&self) -> Result<Option<f64>, StoreError>;

    /// Saves the interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set_stored_interval(&mut self, interval: Interval) -> Result<(), StoreError>;
}

// ============================================================================
// Settings
// ============================================================================

/// On-disk settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Last chosen interval in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_hours: Option<f64>,
}

// ============================================================================
// JsonIntervalStore
// ============================================================================

/// Stores settings as JSON in a file.
#[derive(Debug, Clone)]
pub struct JsonIntervalStore {
    path: PathBuf,
}

impl JsonIntervalStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default settings path,
    /// `~/.standing-desk-timer/settings.json`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::HomeDirectoryNotFound`] if `$HOME` is unknown.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::HomeDirectoryNotFound)?;
        Ok(home.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings document; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Settings, StoreError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the settings document, creating the parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl IntervalStore for JsonIntervalStore {
    fn get_stored_interval(&self) -> Result<Option<f64>, StoreError> {
        Ok(self.load()?.interval_hours)
    }

    fn set_stored_interval(&mut self, interval: Interval) -> Result<(), StoreError> {
        // An unreadable file is replaced rather than blocking the save.
        let mut settings = self.load().unwrap_or_default();
        settings.interval_hours = Some(interval.hours());
        self.save(&settings)?;
        tracing::debug!(path = %self.path.display(), interval_hours = interval.hours(), "interval saved");
        Ok(())
    }
}

// ============================================================================
// MemoryIntervalStore
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    value: Option<f64>,
    write_count: usize,
    should_fail: bool,
}

/// In-memory store for tests. Clones share the same value.
#[derive(Debug, Default, Clone)]
pub struct MemoryIntervalStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryIntervalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a raw value.
    #[must_use]
    pub fn with_value(hours: f64) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().value = Some(hours);
        store
    }

    /// Makes reads and writes fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.state.lock().unwrap().should_fail = should_fail;
    }

    /// Current raw value.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.state.lock().unwrap().value
    }

    /// Number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().write_count
    }
}

impl IntervalStore for MemoryIntervalStore {
    fn get_stored_interval(&self) -> Result<Option<f64>, StoreError> {
        let state = self.state.lock().unwrap();
        if state.should_fail {
            return Err(StoreError::Unavailable("Mock failure".to_string()));
        }
        Ok(state.value)
    }

    fn set_stored_interval(&mut self, interval: Interval) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.should_fail {
            return Err(StoreError::Unavailable("Mock failure".to_string()));
        }
        state.value = Some(interval.hours());
        state.write_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod json_store_tests {
        use super::*;

        fn temp_store() -> (tempfile::TempDir, JsonIntervalStore) {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonIntervalStore::new(dir.path().join("nested").join("settings.json"));
            (dir, store)
        }

        #[test]
        fn test_default_path_under_home() {
            // Only meaningful where a home directory is known.
            if let Ok(path) = JsonIntervalStore::default_path() {
                assert!(path.ends_with(".standing-desk-timer/settings.json"));
                assert_eq!(JsonIntervalStore::new(&path).path(), path.as_path());
            }
        }

        #[test]
        fn test_missing_file_is_absent() {
            let (_dir, store) = temp_store();
            assert_eq!(store.get_stored_interval().unwrap(), None);
        }

        #[test]
        fn test_set_then_get() {
            let (_dir, mut store) = temp_store();

            store
                .set_stored_interval(Interval::new(2.5).unwrap())
                .unwrap();

            assert!(store.path().exists());
            assert_eq!(store.get_stored_interval().unwrap(), Some(2.5));
        }

        #[test]
        fn test_file_format() {
            let (_dir, mut store) = temp_store();
            store
                .set_stored_interval(Interval::new(0.5).unwrap())
                .unwrap();

            let contents = fs::read_to_string(store.path()).unwrap();
            let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
            assert_eq!(value["interval_hours"], 0.5);
        }

        #[test]
        fn test_missing_key_is_absent() {
            let (_dir, store) = temp_store();
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(store.path(), "{}").unwrap();

            assert_eq!(store.get_stored_interval().unwrap(), None);
        }

        #[test]
        fn test_stored_zero_is_returned_raw() {
            let (_dir, store) = temp_store();
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(store.path(), r#"{"interval_hours": 0.0}"#).unwrap();

            assert_eq!(store.get_stored_interval().unwrap(), Some(0.0));
            assert_eq!(
                Interval::from_stored(store.get_stored_interval().unwrap()),
                Interval::default()
            );
        }

        #[test]
        fn test_invalid_json_is_parse_error() {
            let (_dir, store) = temp_store();
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(store.path(), "not json").unwrap();

            let result = store.get_stored_interval();
            assert!(matches!(result, Err(StoreError::Parse { .. })));
        }

        #[test]
        fn test_set_overwrites_invalid_file() {
            let (_dir, mut store) = temp_store();
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(store.path(), "not json").unwrap();

            store
                .set_stored_interval(Interval::new(3.0).unwrap())
                .unwrap();
            assert_eq!(store.get_stored_interval().unwrap(), Some(3.0));
        }
    }

    mod memory_store_tests {
        use super::*;

        #[test]
        fn test_empty_by_default() {
            let store = MemoryIntervalStore::new();
            assert_eq!(store.get_stored_interval().unwrap(), None);
        }

        #[test]
        fn test_with_value() {
            let store = MemoryIntervalStore::with_value(0.0);
            assert_eq!(store.get_stored_interval().unwrap(), Some(0.0));
        }

        #[test]
        fn test_set_records_writes() {
            let mut store = MemoryIntervalStore::new();
            let observer = store.clone();

            store
                .set_stored_interval(Interval::new(1.5).unwrap())
                .unwrap();

            assert_eq!(observer.value(), Some(1.5));
            assert_eq!(observer.write_count(), 1);
        }

        #[test]
        fn test_should_fail() {
            let mut store = MemoryIntervalStore::new();
            store.set_should_fail(true);

            assert!(store.get_stored_interval().is_err());
            assert!(store.set_stored_interval(Interval::default()).is_err());
            assert_eq!(store.write_count(), 0);
        }
    }
}
