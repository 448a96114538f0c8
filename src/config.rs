//! Runtime configuration.
//!
//! Resolved once at startup from the environment:
//!
//! - `PRISM_DATA_DIR`: directory holding the JSON documents (default:
//!   [`platform::data_dir`](crate::platform::data_dir)).
//! - `PRISM_REMOTE_FILTER_LISTS`: `0`, `false` or `off` disables
//!   downloading EasyList/EasyPrivacy.

use std::env;
use std::path::PathBuf;

use crate::platform;
use crate::types::tab::DEFAULT_TAB_URL;

pub const DATA_DIR_ENV: &str = "PRISM_DATA_DIR";
pub const REMOTE_FILTER_LISTS_ENV: &str = "PRISM_REMOTE_FILTER_LISTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub remote_filter_lists: bool,
    /// URL for new tabs opened without one.
    pub default_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: platform::data_dir(),
            remote_filter_lists: true,
            default_url: DEFAULT_TAB_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var(DATA_DIR_ENV).ok(),
            env::var(REMOTE_FILTER_LISTS_ENV).ok(),
        )
    }

    /// Configuration with every document under `dir` and no downloads.
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            data_dir: dir.into(),
            remote_filter_lists: false,
            ..Self::default()
        }
    }

    fn from_vars(data_dir: Option<String>, remote_lists: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(flag) = remote_lists {
            config.remote_filter_lists =
                !matches!(flag.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off");
        }
        config
    }
}
