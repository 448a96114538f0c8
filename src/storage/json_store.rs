//! JSON document storage for Prism.
//!
//! Provides the [`JsonStore`] struct that keeps one JSON document per
//! [`StoreKey`] in the application data directory and seeds missing
//! documents with defaults on open.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::bookmark::default_bookmarks;
use crate::types::errors::StoreError;
use crate::types::settings::BrowserSettings;
use crate::types::tab::{Tab, DEFAULT_TAB_URL};
use crate::types::theme::Theme;

/// Identifies one persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Tabs,
    Settings,
    Bookmarks,
    Theme,
}

impl StoreKey {
    pub const ALL: [StoreKey; 4] = [
        StoreKey::Tabs,
        StoreKey::Settings,
        StoreKey::Bookmarks,
        StoreKey::Theme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Tabs => "tabs",
            StoreKey::Settings => "settings",
            StoreKey::Bookmarks => "bookmarks",
            StoreKey::Theme => "theme",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            StoreKey::Tabs => "tabs.json",
            StoreKey::Settings => "settings.json",
            StoreKey::Bookmarks => "bookmarks.json",
            StoreKey::Theme => "theme.json",
        }
    }

    /// Document written when the file does not exist yet.
    fn default_document(&self) -> Result<Value, StoreError> {
        let value = match self {
            StoreKey::Tabs => serde_json::to_value(vec![Tab::new(DEFAULT_TAB_URL)]),
            StoreKey::Settings => serde_json::to_value(BrowserSettings::default()),
            StoreKey::Bookmarks => serde_json::to_value(default_bookmarks()),
            StoreKey::Theme => serde_json::to_value(Theme::default()),
        };
        value.map_err(|e| StoreError::SerializationError(e.to_string()))
    }
}

/// Key-addressed JSON document store rooted at one directory.
#[derive(Debug)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Opens (or creates) the store directory and seeds any missing documents.
    ///
    /// # Errors
    /// Returns `StoreError::IoError` if the directory cannot be created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::IoError(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let store = Self { dir };
        store.initialize_defaults();
        Ok(store)
    }

    /// Writes the default document for every key whose file is missing.
    ///
    /// Failures are logged; the affected key keeps falling back to its
    /// in-memory default on read.
    fn initialize_defaults(&self) {
        for key in StoreKey::ALL {
            if self.path(key).exists() {
                continue;
            }
            let result = key
                .default_document()
                .and_then(|doc| self.write_value(key, &doc));
            match result {
                Ok(()) => debug!(key = key.as_str(), "seeded default document"),
                Err(e) => warn!(key = key.as_str(), error = %e, "failed to seed default document"),
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Reads the raw document for `key`, or `None` if the file does not exist.
    pub fn read_value(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| {
            StoreError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let value = serde_json::from_str(&content).map_err(|e| {
            StoreError::SerializationError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    /// Reads and decodes the document for `key`.
    ///
    /// A missing, unreadable or malformed document yields `default`; the
    /// failure is logged and never surfaced.
    pub fn read<T: DeserializeOwned>(&self, key: StoreKey, default: T) -> T {
        let value = match self.read_value(key) {
            Ok(Some(value)) => value,
            Ok(None) => return default,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "falling back to default document");
                return default;
            }
        };
        match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "stored document has unexpected shape");
                default
            }
        }
    }

    /// Overwrites the document for `key`.
    ///
    /// The JSON is written to a sibling temp file and renamed into place, so a
    /// concurrent reader sees either the old or the new document.
    pub fn write_value(&self, key: StoreKey, value: &Value) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        let path = self.path(key);
        let tmp = self.dir.join(format!(".{}.tmp", key.file_name()));
        fs::write(&tmp, json).map_err(|e| {
            StoreError::IoError(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            StoreError::IoError(format!("Failed to replace {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    pub fn write<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.write_value(key, &value)
    }
}
