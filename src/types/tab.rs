use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// URL opened by new tabs when none is given.
pub const DEFAULT_TAB_URL: &str = "https://www.google.com";

/// Placeholder title until the page reports its own.
pub const NEW_TAB_TITLE: &str = "New Tab";

/// Represents a browser tab with its current state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tab {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub favicon: String,
    #[serde(default)]
    pub active: bool,
}

impl Tab {
    /// A fresh active tab for `url` with a newly generated id.
    pub fn new(url: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            title: NEW_TAB_TITLE.to_string(),
            favicon: String::new(),
            active: true,
        }
    }
}

/// Partial update applied by navigation events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TabPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl TabPatch {
    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn url(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn favicon(favicon: &str) -> Self {
        Self {
            favicon: Some(favicon.to_string()),
            ..Self::default()
        }
    }
}

/// Ordered tab collection plus the id of the active tab, as broadcast to observers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabsSnapshot {
    pub tabs: Vec<Tab>,
    pub active_id: Option<String>,
}

impl TabsSnapshot {
    pub fn active_tab(&self) -> Option<&Tab> {
        let id = self.active_id.as_deref()?;
        self.tabs.iter().find(|t| t.id == id)
    }
}
