//! Prism persistence layer.
//!
//! One JSON document per domain (tabs, settings, bookmarks, theme) under the
//! application data directory, written wholesale on every save.
//!
//! # Usage
//!
//! ```no_run
//! use prism::storage::{Storage, StoreKey};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let storage = Storage::open("/tmp/prism-data", runtime.handle()).unwrap();
//!
//! let theme: prism::types::theme::Theme = storage.get(StoreKey::Theme, Default::default());
//! storage.save(StoreKey::Theme, &theme);
//! storage.flush_blocking().unwrap();
//! ```

pub mod json_store;
pub mod writer;

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{error, warn};

pub use json_store::{JsonStore, StoreKey};
pub use writer::StoreWriter;

use crate::managers::tab_manager::TabStore;
use crate::types::errors::StoreError;
use crate::types::tab::Tab;

/// Read-your-writes facade over [`JsonStore`] and its [`StoreWriter`].
pub struct Storage {
    store: Arc<JsonStore>,
    writer: StoreWriter,
}

impl Storage {
    /// Opens the store at `dir` and starts its writer on `handle`.
    pub fn open<P: AsRef<Path>>(dir: P, handle: &Handle) -> Result<Self, StoreError> {
        let store = Arc::new(JsonStore::open(dir)?);
        let writer = StoreWriter::spawn(store.clone(), handle);
        Ok(Self { store, writer })
    }

    pub fn dir(&self) -> &Path {
        self.store.dir()
    }

    /// Current document for `key`: a scheduled but unwritten value if there
    /// is one, else the file on disk, else `default`.
    pub fn get<T: DeserializeOwned>(&self, key: StoreKey, default: T) -> T {
        if let Some(value) = self.writer.pending(key) {
            match serde_json::from_value(value) {
                Ok(decoded) => return decoded,
                Err(e) => warn!(key = key.as_str(), error = %e, "pending document has unexpected shape"),
            }
        }
        self.store.read(key, default)
    }

    /// Schedules a full overwrite of the document for `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => self.writer.schedule(key, value),
            Err(e) => error!(key = key.as_str(), error = %e, "failed to serialize document"),
        }
    }

    pub async fn flush(&self) -> Result<(), StoreError> {
        self.writer.flush().await
    }

    pub fn flush_blocking(&self) -> Result<(), StoreError> {
        self.writer.flush_blocking()
    }
}

impl TabStore for Storage {
    fn load_tabs(&self) -> Vec<Tab> {
        self.get(StoreKey::Tabs, Vec::new())
    }

    fn save_tabs(&self, tabs: &[Tab]) {
        self.save(StoreKey::Tabs, tabs);
    }
}
