//! App Core for Prism.
//!
//! Central struct holding the store, managers and services, and managing
//! the application lifecycle.

use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::host::{HeadlessHost, HostSession};
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::tab_manager::{TabManager, TabManagerTrait, TabStore};
use crate::services::privacy_engine::{PrivacyEngine, PrivacyEngineTrait};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::theme_engine::{ThemeEngine, ThemeEngineTrait};
use crate::storage::Storage;
use crate::types::errors::{AppError, StoreError};

/// Central application struct holding all managers and services.
///
/// Everything is owned here and passed explicitly; UI code holds the `App`
/// rather than reaching for globals.
pub struct App {
    pub config: AppConfig,
    pub storage: Arc<Storage>,
    pub tab_manager: TabManager,
    pub bookmark_manager: BookmarkManager,
    pub settings_engine: SettingsEngine,
    pub theme_engine: ThemeEngine,
    pub privacy_engine: PrivacyEngine,
    host: Arc<dyn HostSession>,
    // Declared last so the store writer is dropped before its runtime.
    runtime: Runtime,
}

impl App {
    /// Creates an App with a [`HeadlessHost`].
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Self::with_host(config, Arc::new(HeadlessHost::new()))
    }

    /// Creates a new App, opening the store and starting its writer.
    ///
    /// Nothing is loaded until [`App::startup`].
    pub fn with_host(config: AppConfig, host: Arc<dyn HostSession>) -> Result<Self, AppError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("prism-io")
            .enable_all()
            .build()
            .map_err(|e| AppError::Runtime(e.to_string()))?;

        let storage = Arc::new(Storage::open(&config.data_dir, runtime.handle())?);
        info!(data_dir = %storage.dir().display(), "store opened");

        let tab_store: Arc<dyn TabStore> = storage.clone();
        let tab_manager = TabManager::new(tab_store).with_default_url(&config.default_url);
        let bookmark_manager = BookmarkManager::new(storage.clone());
        let settings_engine = SettingsEngine::new(storage.clone());
        let theme_engine = ThemeEngine::new(storage.clone());

        #[cfg(feature = "network")]
        let privacy_engine = if config.remote_filter_lists {
            PrivacyEngine::new().with_remote_lists(runtime.handle().clone())
        } else {
            PrivacyEngine::new()
        };
        #[cfg(not(feature = "network"))]
        let privacy_engine = PrivacyEngine::new();

        Ok(Self {
            config,
            storage,
            tab_manager,
            bookmark_manager,
            settings_engine,
            theme_engine,
            privacy_engine,
            host,
            runtime,
        })
    }

    /// Startup sequence: load settings, theme and bookmarks, restore tabs,
    /// then start the ad blocker if the settings ask for it.
    pub fn startup(&mut self) {
        let ad_blocker_enabled = self.settings_engine.load().privacy.ad_blocker_enabled;
        self.theme_engine.load();
        self.bookmark_manager.load();
        self.tab_manager.load();
        self.privacy_engine.set_ad_block_enabled(ad_blocker_enabled);
        info!(tabs = self.tab_manager.tab_count(), "startup complete");
    }

    /// Shutdown sequence: wait until every scheduled write is on disk.
    pub fn shutdown(&mut self) -> Result<(), StoreError> {
        let result = self.storage.flush_blocking();
        match &result {
            Ok(()) => info!("store flushed"),
            Err(e) => error!(error = %e, "failed to flush store on shutdown"),
        }
        result
    }

    /// Turns the ad blocker on or off and persists the choice in settings.
    pub fn set_ad_block_enabled(&mut self, enabled: bool) {
        self.privacy_engine.set_ad_block_enabled(enabled);
        self.settings_engine.set_ad_blocker_enabled(enabled);
    }

    /// Brings the ad blocker in line with the current settings.
    pub fn sync_ad_blocker(&mut self) {
        let enabled = self.settings_engine.get_settings().privacy.ad_blocker_enabled;
        self.privacy_engine.set_ad_block_enabled(enabled);
    }

    pub fn host(&self) -> &dyn HostSession {
        self.host.as_ref()
    }

    pub fn runtime_handle(&self) -> &Handle {
        self.runtime.handle()
    }
}
