//! Theme Engine: loads, edits, imports and exports the chrome theme and
//! maps it to CSS variables.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::merge_json;
use crate::storage::{Storage, StoreKey};
use crate::types::errors::ThemeError;
use crate::types::theme::Theme;

/// Trait defining the theme engine interface.
pub trait ThemeEngineTrait {
    fn load(&mut self) -> &Theme;
    fn get_theme(&self) -> &Theme;
    fn replace(&mut self, theme: Theme) -> Result<(), ThemeError>;
    fn update(&mut self, patch: &Value) -> Result<(), ThemeError>;
    fn export_theme(&self) -> String;
    fn import_theme(&mut self, json: &str) -> Result<(), ThemeError>;
    fn get_css_variables(&self) -> BTreeMap<String, String>;
}

/// Validates a hex color string (e.g. "#8b5cf6" or "#fff").
fn is_valid_hex_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn validate(theme: &Theme) -> Result<(), ThemeError> {
    for color in [
        &theme.primary_color,
        &theme.background_color,
        &theme.accent_color,
    ] {
        if !is_valid_hex_color(color) {
            return Err(ThemeError::InvalidColor(color.clone()));
        }
    }
    Ok(())
}

/// The theme engine implementation.
pub struct ThemeEngine {
    storage: Arc<Storage>,
    theme: Theme,
}

impl ThemeEngine {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            theme: Theme::default(),
        }
    }
}

impl ThemeEngineTrait for ThemeEngine {
    /// Loads the stored theme merged over the defaults.
    fn load(&mut self) -> &Theme {
        self.theme = self.storage.get(StoreKey::Theme, Theme::default());
        &self.theme
    }

    fn get_theme(&self) -> &Theme {
        &self.theme
    }

    fn replace(&mut self, theme: Theme) -> Result<(), ThemeError> {
        validate(&theme)?;
        self.theme = theme;
        self.storage.save(StoreKey::Theme, &self.theme);
        Ok(())
    }

    /// Merges a partial theme document over the current theme and saves.
    fn update(&mut self, patch: &Value) -> Result<(), ThemeError> {
        if !patch.is_object() {
            return Err(ThemeError::InvalidDocument(
                "Theme update must be an object".to_string(),
            ));
        }
        let mut current = serde_json::to_value(&self.theme)
            .map_err(|e| ThemeError::InvalidDocument(e.to_string()))?;
        merge_json(&mut current, patch);
        let theme: Theme = serde_json::from_value(current)
            .map_err(|e| ThemeError::InvalidDocument(e.to_string()))?;
        self.replace(theme)
    }

    /// Pretty-printed JSON of the current theme.
    fn export_theme(&self) -> String {
        serde_json::to_string_pretty(&self.theme).unwrap_or_default()
    }

    /// Applies an exported theme. Fields absent from `json` keep their
    /// current values.
    fn import_theme(&mut self, json: &str) -> Result<(), ThemeError> {
        let patch: Value =
            serde_json::from_str(json).map_err(|e| ThemeError::InvalidDocument(e.to_string()))?;
        self.update(&patch)
    }

    fn get_css_variables(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("--color-primary".into(), self.theme.primary_color.clone());
        vars.insert("--color-background".into(), self.theme.background_color.clone());
        vars.insert("--color-accent".into(), self.theme.accent_color.clone());
        vars.insert("--font-family".into(), self.theme.font_family.clone());
        vars.insert(
            "--blur-enabled".into(),
            if self.theme.blur_enabled { "1" } else { "0" }.into(),
        );
        vars
    }
}
