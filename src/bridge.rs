//! Bridge method handler for the Prism request/response protocol.
//!
//! Shared by the `prism-bridge` JSON-RPC binary and the webview IPC handler.
//! The `handle_method` function dispatches a named call to the appropriate
//! manager or service on the `App`.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::privacy_engine::PrivacyEngineTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::theme_engine::ThemeEngineTrait;
use crate::storage::StoreKey;
use crate::types::bookmark::Bookmark;
use crate::types::privacy::WindowCommand;
use crate::types::settings::BrowserSettings;
use crate::types::tab::{Tab, TabPatch};
use crate::types::theme::Theme;

/// Decodes a required parameter into `T`.
fn param<T: DeserializeOwned>(params: &Value, name: &str) -> Result<T, String> {
    let value = params.get(name).ok_or_else(|| format!("missing {}", name))?;
    serde_json::from_value(value.clone()).map_err(|e| format!("invalid {}: {}", name, e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn tabs_snapshot(app: &App) -> Result<Value, String> {
    to_json(&app.tab_manager.snapshot())
}

fn window_command(app: &App, command: WindowCommand) -> Result<Value, String> {
    app.host().window(command).map_err(|e| e.to_string())?;
    Ok(Value::Null)
}

/// Dispatch a bridge call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Tabs ───
        "tabs.get" => to_json(&app.storage.get(StoreKey::Tabs, Vec::<Tab>::new())),
        "tabs.save" => {
            let tabs: Vec<Tab> = param(params, "tabs")?;
            app.storage.save(StoreKey::Tabs, &tabs);
            app.tab_manager.load();
            Ok(Value::Null)
        }
        "tabs.list" => tabs_snapshot(app),
        "tabs.add" => {
            let url = params.get("url").and_then(|v| v.as_str());
            app.tab_manager.add_tab(url);
            tabs_snapshot(app)
        }
        "tabs.close" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            app.tab_manager.close_tab(id);
            tabs_snapshot(app)
        }
        "tabs.activate" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            app.tab_manager.set_active(id);
            tabs_snapshot(app)
        }
        "tabs.update" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let patch: TabPatch = param(params, "patch")?;
            app.tab_manager.update_tab(id, patch);
            tabs_snapshot(app)
        }
        "tabs.duplicate" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            app.tab_manager.duplicate_tab(id);
            tabs_snapshot(app)
        }
        "tabs.reorder" => {
            let from: usize = param(params, "from")?;
            let to: usize = param(params, "to")?;
            app.tab_manager.reorder_tabs(from, to);
            tabs_snapshot(app)
        }

        // ─── Settings ───
        "settings.get" => to_json(app.settings_engine.get_settings()),
        "settings.save" => {
            let settings: BrowserSettings = param(params, "settings")?;
            app.settings_engine.replace(settings);
            app.sync_ad_blocker();
            Ok(Value::Null)
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            app.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            app.sync_ad_blocker();
            Ok(Value::Null)
        }

        // ─── Bookmarks ───
        "bookmarks.get" => to_json(&app.bookmark_manager.list_bookmarks()),
        "bookmarks.save" => {
            let bookmarks: Vec<Bookmark> = param(params, "bookmarks")?;
            app.bookmark_manager.replace_all(bookmarks);
            Ok(Value::Null)
        }
        "bookmarks.add" => {
            let bookmark: Bookmark = param(params, "bookmark")?;
            let id = app.bookmark_manager.add_bookmark(bookmark).map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "bookmarks.remove" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            app.bookmark_manager.remove_bookmark(id);
            Ok(Value::Null)
        }

        // ─── Theme ───
        "theme.get" => to_json(app.theme_engine.get_theme()),
        "theme.save" => {
            let theme: Theme = param(params, "theme")?;
            app.theme_engine.replace(theme).map_err(|e| e.to_string())?;
            Ok(Value::Null)
        }
        "theme.export" => Ok(json!({"json": app.theme_engine.export_theme()})),
        "theme.import" => {
            let text = params.get("json").and_then(|v| v.as_str()).ok_or("missing json")?;
            app.theme_engine.import_theme(text).map_err(|e| e.to_string())?;
            to_json(app.theme_engine.get_theme())
        }

        // ─── Privacy ───
        "privacy.clear_cache" => to_json(&app.privacy_engine.clear_cache(app.host())),
        "privacy.clear_cookies" => to_json(&app.privacy_engine.clear_cookies(app.host())),
        "adblock.toggle" => {
            let enabled = params.get("enabled").and_then(|v| v.as_bool()).ok_or("missing enabled")?;
            app.set_ad_block_enabled(enabled);
            Ok(Value::Null)
        }
        "adblock.status" => {
            app.privacy_engine.poll_updates();
            to_json(&app.privacy_engine.status())
        }

        // ─── Window ───
        "window.minimize" => window_command(app, WindowCommand::Minimize),
        "window.maximize" => window_command(app, WindowCommand::ToggleMaximize),
        "window.close" => window_command(app, WindowCommand::Close),

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
