use serde::{Deserialize, Serialize};

use super::tab::DEFAULT_TAB_URL;

/// Top-level browser settings container.
///
/// Every section is `#[serde(default)]`, so a partial document on disk is
/// merged over the defaults when loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BrowserSettings {
    pub general: GeneralSettings,
    pub appearance: AppearanceSettings,
    pub performance: PerformanceSettings,
    pub privacy: PrivacySettings,
}

/// General browser settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralSettings {
    pub startup_behavior: StartupBehavior,
    pub startup_pages: Vec<String>,
    pub search_engine: SearchEngine,
    /// Search URL template with a `%s` placeholder, used with `SearchEngine::Custom`.
    pub custom_search_url: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            startup_behavior: StartupBehavior::Restore,
            startup_pages: vec![DEFAULT_TAB_URL.to_string()],
            search_engine: SearchEngine::Google,
            custom_search_url: None,
        }
    }
}

/// What the browser does on startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StartupBehavior {
    NewTab,
    Restore,
    Specific,
}

/// Search provider used for non-URL address bar input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Google,
    DuckDuckGo,
    Custom,
}

/// Appearance and visual settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub animations_enabled: bool,
    pub border_radius: u32,
    pub show_bookmarks_bar: bool,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            animations_enabled: true,
            border_radius: 8,
            show_bookmarks_bar: true,
        }
    }
}

/// Resource limits and inactive tab handling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformanceSettings {
    pub max_cpu_percent: u32,
    pub max_ram_percent: u32,
    pub auto_close_inactive_tabs: bool,
    /// Minutes.
    pub inactive_tab_timeout: u32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            max_cpu_percent: 80,
            max_ram_percent: 70,
            auto_close_inactive_tabs: false,
            inactive_tab_timeout: 30,
        }
    }
}

/// Privacy-related settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivacySettings {
    pub ad_blocker_enabled: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            ad_blocker_enabled: true,
        }
    }
}
