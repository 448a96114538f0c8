use serde::{Deserialize, Serialize};

/// User-editable color theme for the browser chrome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub background_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub blur_enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#8b5cf6".to_string(),
            background_color: "#0a0a0f".to_string(),
            accent_color: "#ec4899".to_string(),
            font_family: "Inter".to_string(),
            blur_enabled: true,
        }
    }
}
