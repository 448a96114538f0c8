use serde::{Deserialize, Serialize};

/// Folder assigned to bookmarks saved without one.
pub const DEFAULT_FOLDER: &str = "default";

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

/// Represents a saved bookmark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub favicon: String,
    #[serde(default = "default_folder")]
    pub folder: String,
}

/// Bookmarks written on first run.
pub fn default_bookmarks() -> Vec<Bookmark> {
    vec![Bookmark {
        id: "1".to_string(),
        title: "Google".to_string(),
        url: "https://www.google.com".to_string(),
        favicon: "https://www.google.com/favicon.ico".to_string(),
        folder: default_folder(),
    }]
}
