// Prism Settings Engine
// Manages user settings: loading (merged over defaults), saving, updating
// individual values or whole sections, and resetting to defaults.
// Settings live in the `settings` store document.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::merge_json;
use crate::storage::{Storage, StoreKey};
use crate::types::errors::SettingsError;
use crate::types::settings::BrowserSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> &BrowserSettings;
    fn save(&self);
    fn get_settings(&self) -> &BrowserSettings;
    fn replace(&mut self, settings: BrowserSettings);
    fn update(&mut self, patch: &Value) -> Result<(), SettingsError>;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn set_ad_blocker_enabled(&mut self, enabled: bool);
    fn reset(&mut self);
}

/// Settings engine implementation that persists settings through the store.
pub struct SettingsEngine {
    storage: Arc<Storage>,
    settings: BrowserSettings,
}

impl SettingsEngine {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            settings: BrowserSettings::default(),
        }
    }

    fn to_value(&self) -> Result<Value, SettingsError> {
        serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the store.
    ///
    /// Missing fields take their defaults; a missing or malformed document
    /// yields the default settings.
    fn load(&mut self) -> &BrowserSettings {
        self.settings = self.storage.get(StoreKey::Settings, BrowserSettings::default());
        &self.settings
    }

    /// Schedules a write of the current settings.
    fn save(&self) {
        self.storage.save(StoreKey::Settings, &self.settings);
    }

    /// Returns a reference to the current in-memory settings.
    fn get_settings(&self) -> &BrowserSettings {
        &self.settings
    }

    fn replace(&mut self, settings: BrowserSettings) {
        self.settings = settings;
        self.save();
    }

    /// Deep-merges a partial settings document, e.g.
    /// `{"privacy": {"adBlockerEnabled": false}}`, then saves.
    fn update(&mut self, patch: &Value) -> Result<(), SettingsError> {
        if !patch.is_object() {
            return Err(SettingsError::InvalidValue(
                "Settings update must be an object".to_string(),
            ));
        }

        let mut json_value = self.to_value()?;
        merge_json(&mut json_value, patch);

        let new_settings: BrowserSettings = serde_json::from_value(json_value)
            .map_err(|e| SettingsError::InvalidValue(format!("Invalid settings update: {}", e)))?;

        self.settings = new_settings;
        self.save();
        Ok(())
    }

    /// Updates an individual setting by dot-notation key path.
    ///
    /// Converts the current settings to a `serde_json::Value`, navigates the
    /// dot-separated key path, updates the target value, then deserializes
    /// back into `BrowserSettings`. Saves after a successful update.
    ///
    /// # Examples
    /// - `"general.searchEngine"` → updates `settings.general.search_engine`
    /// - `"privacy.adBlockerEnabled"` → updates `settings.privacy.ad_blocker_enabled`
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let parts: Vec<&str> = key.split('.').collect();
        let mut json_value = self.to_value()?;

        {
            let mut current = &mut json_value;
            for (i, part) in parts.iter().enumerate() {
                let is_last = i == parts.len() - 1;
                let map = match current {
                    Value::Object(map) => map,
                    _ => {
                        return Err(SettingsError::InvalidKey(format!(
                            "Cannot navigate to key '{}': intermediate value is not an object",
                            key
                        )));
                    }
                };
                let Some(slot) = map.get_mut(*part) else {
                    return Err(SettingsError::InvalidKey(format!(
                        "Key '{}' not found in settings",
                        key
                    )));
                };
                if is_last {
                    *slot = value;
                    break;
                }
                current = slot;
            }
        }

        // Deserialize back into BrowserSettings to validate the new value
        let new_settings: BrowserSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        debug!(key, "setting updated");
        self.settings = new_settings;
        self.save();
        Ok(())
    }

    fn set_ad_blocker_enabled(&mut self, enabled: bool) {
        self.settings.privacy.ad_blocker_enabled = enabled;
        self.save();
    }

    /// Resets all settings to factory defaults and saves.
    fn reset(&mut self) {
        self.settings = BrowserSettings::default();
        self.save();
    }
}
