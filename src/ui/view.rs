//! View models for the browser chrome and the scripts that push them into
//! the webview.
//!
//! Nothing here touches the window system, so the chrome's behavior (title
//! truncation, address bar input, panel toggling) is usable and testable
//! without the `gui` feature.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::managers::tab_manager::TabObserver;
use crate::types::bookmark::Bookmark;
use crate::types::settings::{GeneralSettings, SearchEngine};
use crate::types::tab::TabsSnapshot;

/// Longest tab title shown before it is cut and suffixed with `...`.
pub const TITLE_MAX_CHARS: usize = 20;

const GOOGLE_SEARCH: &str = "https://www.google.com/search?q=";
const DUCKDUCKGO_SEARCH: &str = "https://duckduckgo.com/?q=";

/// Shortens `title` to [`TITLE_MAX_CHARS`] characters plus `...`.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= TITLE_MAX_CHARS {
        return title.to_string();
    }
    let mut short: String = title.chars().take(TITLE_MAX_CHARS).collect();
    short.push_str("...");
    short
}

// ─── Tab strip ───

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub id: String,
    /// Truncated title for the strip.
    pub title: String,
    /// Untruncated title, used as the tooltip.
    pub full_title: String,
    pub favicon: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabStripView {
    pub tabs: Vec<TabItem>,
    pub active_id: Option<String>,
}

impl TabStripView {
    pub fn from_snapshot(snapshot: &TabsSnapshot) -> Self {
        let tabs = snapshot
            .tabs
            .iter()
            .map(|tab| TabItem {
                id: tab.id.clone(),
                title: truncate_title(&tab.title),
                full_title: tab.title.clone(),
                favicon: tab.favicon.clone(),
                active: tab.active,
            })
            .collect();
        Self {
            tabs,
            active_id: snapshot.active_id.clone(),
        }
    }
}

// ─── Navigation bar ───

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavBarView {
    pub url: String,
    pub bookmarked: bool,
}

impl NavBarView {
    pub fn new(snapshot: &TabsSnapshot, bookmarks: &[Bookmark]) -> Self {
        let url = snapshot
            .active_tab()
            .map(|tab| tab.url.clone())
            .unwrap_or_default();
        let bookmarked = !url.is_empty() && bookmarks.iter().any(|b| b.url == url);
        Self { url, bookmarked }
    }
}

/// Whether address bar input should be treated as a URL rather than a search.
pub fn looks_like_url(input: &str) -> bool {
    (input.contains('.') && !input.contains(' ')) || input.starts_with("http")
}

/// Search URL for `query` with the configured engine. A custom engine
/// without a template falls back to Google.
pub fn search_url(query: &str, settings: &GeneralSettings) -> String {
    let encoded = urlencoding::encode(query);
    match settings.search_engine {
        SearchEngine::Google => format!("{}{}", GOOGLE_SEARCH, encoded),
        SearchEngine::DuckDuckGo => format!("{}{}", DUCKDUCKGO_SEARCH, encoded),
        SearchEngine::Custom => match settings.custom_search_url.as_deref() {
            Some(template) if !template.trim().is_empty() => template.replacen("%s", &encoded, 1),
            _ => format!("{}{}", GOOGLE_SEARCH, encoded),
        },
    }
}

/// Turns address bar input into the URL to load. Blank input loads nothing.
pub fn normalize_input(input: &str, settings: &GeneralSettings) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if !looks_like_url(input) {
        return Some(search_url(input, settings));
    }
    if input.starts_with("http://") || input.starts_with("https://") {
        Some(input.to_string())
    } else {
        Some(format!("https://{}", input))
    }
}

// ─── Bookmarks bar ───

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookmarksBarView {
    pub visible: bool,
    pub items: Vec<Bookmark>,
}

impl BookmarksBarView {
    pub fn new(bookmarks: &[Bookmark], visible: bool) -> Self {
        Self {
            visible,
            items: bookmarks.to_vec(),
        }
    }
}

// ─── Sidebar panels ───

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Settings,
    Privacy,
}

/// Which side panel is open and whether the sidebar is collapsed.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PanelState {
    pub open: Option<Panel>,
    pub collapsed: bool,
}

impl PanelState {
    /// Opens `panel`, or closes it if it is already open.
    pub fn toggle(&mut self, panel: Panel) {
        self.open = if self.open == Some(panel) { None } else { Some(panel) };
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }
}

// ─── Scripts ───

fn render_call<T: Serialize + ?Sized>(function: &str, payload: &T) -> String {
    let json = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!("window.__prism && window.__prism.{}({});", function, json)
}

pub fn render_tabs_script(view: &TabStripView) -> String {
    render_call("renderTabs", view)
}

pub fn render_nav_script(view: &NavBarView) -> String {
    render_call("renderNav", view)
}

pub fn render_bookmarks_script(view: &BookmarksBarView) -> String {
    render_call("renderBookmarks", view)
}

pub fn render_panels_script(state: &PanelState) -> String {
    render_call("renderPanels", state)
}

/// Applies CSS variables (e.g. `--color-primary`) to the chrome root.
pub fn render_theme_script(variables: &BTreeMap<String, String>) -> String {
    render_call("renderTheme", variables)
}

/// Delivers the bridge result for IPC call `id` back to the chrome.
pub fn render_reply_script(id: &serde_json::Value, result: &Result<serde_json::Value, String>) -> String {
    let payload = match result {
        Ok(value) => serde_json::json!({"id": id, "result": value}),
        Err(error) => serde_json::json!({"id": id, "error": error}),
    };
    render_call("reply", &payload)
}

/// Tab observer that turns every change into a tab strip render script.
pub struct ChromeRenderer {
    sink: Box<dyn Fn(String)>,
}

impl ChromeRenderer {
    pub fn new(sink: impl Fn(String) + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }
}

impl TabObserver for ChromeRenderer {
    fn on_tabs_changed(&self, snapshot: &TabsSnapshot) {
        (self.sink)(render_tabs_script(&TabStripView::from_snapshot(snapshot)));
    }
}
