//! WebView-based browser application using `wry` + `tao`.
//!
//! Architecture:
//! - One frameless window, one webview. The chrome (tab strip, navigation
//!   bar, bookmarks bar, panels) is injected into every page with
//!   `with_initialization_script` and draws itself as an overlay.
//! - IPC from JS → Rust via `window.ipc.postMessage()`. Messages are bridge
//!   calls (`{id, method, params}`) plus a few chrome-only methods; replies
//!   go back through `window.__prism.reply`.
//! - Tab changes reach the chrome through observers on the tab manager: one
//!   re-renders the tab strip, the other loads the active tab's URL when it
//!   changes.

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::{json, Value};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use tao::window::WindowBuilder;
use tracing::{debug, error, info, warn};
use wry::{PageLoadEvent, WebViewBuilder};

use crate::app::App;
use crate::bridge::handle_method;
use crate::config::AppConfig;
use crate::host::HostSession;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::privacy_engine::PrivacyEngineTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::theme_engine::ThemeEngineTrait;
use crate::types::errors::HostError;
use crate::types::privacy::{ResourceType, WindowCommand};
use crate::types::tab::{TabPatch, TabsSnapshot};
use crate::ui::view::{
    normalize_input, render_bookmarks_script, render_nav_script, render_panels_script,
    render_reply_script, render_tabs_script, render_theme_script, BookmarksBarView,
    ChromeRenderer, NavBarView, Panel, PanelState, TabStripView,
};

#[derive(Debug)]
enum UserEvent {
    LoadUrl(String),
    EvalScript(String),
    Window(WindowCommand),
    DragWindow,
    ClearBrowsingData(&'static str),
}

const CHROME_JS: &str = include_str!("../../resources/ui/chrome.js");
const CHROME_CSS: &str = include_str!("../../resources/ui/chrome.css");

/// Host session backed by the running event loop.
struct WindowHost {
    proxy: EventLoopProxy<UserEvent>,
}

impl WindowHost {
    fn send(&self, event: UserEvent) -> Result<(), HostError> {
        self.proxy
            .send_event(event)
            .map_err(|_| HostError::EventLoopClosed)
    }
}

impl HostSession for WindowHost {
    // The webview only clears all browsing data at once, so both requests
    // clear cache and cookies together.
    fn clear_cache(&self) -> Result<(), HostError> {
        self.send(UserEvent::ClearBrowsingData("cache"))
    }

    fn clear_cookies(&self) -> Result<(), HostError> {
        self.send(UserEvent::ClearBrowsingData("cookies"))
    }

    fn window(&self, command: WindowCommand) -> Result<(), HostError> {
        self.send(UserEvent::Window(command))
    }
}

struct BrowserState {
    app: App,
    panels: PanelState,
}

fn initialization_script() -> String {
    format!(
        "window.__PRISM_CSS = {};\n{}",
        serde_json::to_string(CHROME_CSS).unwrap_or_else(|_| "\"\"".into()),
        CHROME_JS
    )
}

/// Everything the chrome shows apart from the tab strip.
fn chrome_refresh(state: &BrowserState) -> String {
    let app = &state.app;
    let snapshot = app.tab_manager.snapshot();
    let bookmarks = app.bookmark_manager.list_bookmarks();
    let show_bar = app.settings_engine.get_settings().appearance.show_bookmarks_bar;
    [
        render_theme_script(&app.theme_engine.get_css_variables()),
        render_nav_script(&NavBarView::new(&snapshot, bookmarks)),
        render_bookmarks_script(&BookmarksBarView::new(bookmarks, show_bar)),
        render_panels_script(&state.panels),
    ]
    .join("\n")
}

// ─── IPC handler ───

fn handle_ipc(state: &mut BrowserState, message: &str) -> Option<UserEvent> {
    let msg: Value = match serde_json::from_str(message) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(error = %e, "malformed IPC message");
            return None;
        }
    };
    let id = msg.get("id").cloned().unwrap_or(Value::Null);
    let method = msg.get("method").and_then(|v| v.as_str()).unwrap_or("");
    let params = msg.get("params").cloned().unwrap_or(json!({}));

    let result = match method {
        "ui.ready" => {
            let tabs = render_tabs_script(&TabStripView::from_snapshot(&state.app.tab_manager.snapshot()));
            return Some(UserEvent::EvalScript(format!("{}\n{}", tabs, chrome_refresh(state))));
        }
        "window.drag" => return Some(UserEvent::DragWindow),
        "navigate" => {
            let input = params.get("input").and_then(|v| v.as_str()).unwrap_or("");
            let settings = &state.app.settings_engine.get_settings().general;
            match (normalize_input(input, settings), state.app.tab_manager.get_active_tab()) {
                (Some(url), Some(tab)) => {
                    let tab_id = tab.id.clone();
                    state.app.tab_manager.update_tab(&tab_id, TabPatch::url(&url));
                    Ok(json!({"url": url}))
                }
                _ => Ok(Value::Null),
            }
        }
        "page.meta" => {
            if let Some(tab) = state.app.tab_manager.get_active_tab() {
                let tab_id = tab.id.clone();
                let patch = TabPatch {
                    favicon: params.get("favicon").and_then(|v| v.as_str()).map(str::to_string),
                    ..TabPatch::default()
                };
                if patch.favicon.is_some() {
                    state.app.tab_manager.update_tab(&tab_id, patch);
                }
            }
            Ok(Value::Null)
        }
        "panel.toggle" => match params.get("panel").and_then(|v| v.as_str()) {
            Some("settings") => {
                state.panels.toggle(Panel::Settings);
                Ok(Value::Null)
            }
            Some("privacy") => {
                state.panels.toggle(Panel::Privacy);
                Ok(Value::Null)
            }
            _ => Err("missing panel".to_string()),
        },
        "panel.close" => {
            state.panels.close();
            Ok(Value::Null)
        }
        "sidebar.toggle" => {
            state.panels.toggle_collapsed();
            Ok(Value::Null)
        }
        _ => handle_method(&mut state.app, method, &params),
    };

    if let Err(e) = &result {
        debug!(method, error = %e, "bridge call failed");
    }
    let reply = render_reply_script(&id, &result);
    Some(UserEvent::EvalScript(format!("{}\n{}", reply, chrome_refresh(state))))
}

/// Loads the active tab's URL whenever it differs from what the webview shows.
fn follow_active_tab(
    shown: Rc<RefCell<Option<String>>>,
    proxy: EventLoopProxy<UserEvent>,
) -> impl Fn(&TabsSnapshot) + 'static {
    move |snapshot: &TabsSnapshot| {
        let Some(tab) = snapshot.active_tab() else {
            return;
        };
        let mut shown = shown.borrow_mut();
        if shown.as_deref() != Some(tab.url.as_str()) {
            *shown = Some(tab.url.clone());
            let _ = proxy.send_event(UserEvent::LoadUrl(tab.url.clone()));
        }
    }
}

// ─── Main entry point ───

pub fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env();
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let host = Arc::new(WindowHost {
        proxy: proxy.clone(),
    });
    let mut app = App::with_host(config, host)?;
    app.startup();

    let start_url = app
        .tab_manager
        .get_active_tab()
        .map(|t| t.url.clone())
        .unwrap_or_else(|| app.config.default_url.clone());
    let shown = Rc::new(RefCell::new(Some(start_url.clone())));

    let render_proxy = proxy.clone();
    app.tab_manager.subscribe(Box::new(ChromeRenderer::new(move |script| {
        let _ = render_proxy.send_event(UserEvent::EvalScript(script));
    })));
    app.tab_manager
        .subscribe(Box::new(follow_active_tab(shown.clone(), proxy.clone())));

    let state = Rc::new(RefCell::new(BrowserState {
        app,
        panels: PanelState::default(),
    }));

    let window = WindowBuilder::new()
        .with_title("Prism")
        .with_decorations(false)
        .with_inner_size(tao::dpi::LogicalSize::new(1280.0, 800.0))
        .build(&event_loop)?;

    let ipc_state = state.clone();
    let ipc_proxy = proxy.clone();
    let nav_state = state.clone();
    let nw_state = state.clone();
    let title_state = state.clone();
    let load_state = state.clone();
    let load_shown = shown.clone();

    let builder = WebViewBuilder::new()
        .with_initialization_script(&initialization_script())
        .with_url(&start_url)
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            let Ok(mut s) = ipc_state.try_borrow_mut() else {
                warn!("IPC message dropped while state is busy");
                return;
            };
            if let Some(event) = handle_ipc(&mut s, msg.body()) {
                let _ = ipc_proxy.send_event(event);
            }
        })
        .with_navigation_handler(move |url| {
            let Ok(mut s) = nav_state.try_borrow_mut() else {
                return true;
            };
            s.app.privacy_engine.poll_updates();
            let blocked = s
                .app
                .privacy_engine
                .should_block_request(&url, &url, ResourceType::Document);
            if blocked {
                info!(url = %url, "navigation blocked");
            }
            !blocked
        })
        .with_new_window_req_handler(move |url, _features| {
            if let Ok(mut s) = nw_state.try_borrow_mut() {
                let blocked = s
                    .app
                    .privacy_engine
                    .should_block_request(&url, &url, ResourceType::Subdocument);
                if blocked {
                    info!(url = %url, "pop-up blocked");
                } else if url.starts_with("http://") || url.starts_with("https://") {
                    s.app.tab_manager.add_tab(Some(&url));
                }
            }
            wry::NewWindowResponse::Deny
        })
        .with_document_title_changed_handler(move |title| {
            if let Ok(mut s) = title_state.try_borrow_mut() {
                if let Some(tab) = s.app.tab_manager.get_active_tab() {
                    let tab_id = tab.id.clone();
                    s.app.tab_manager.update_tab(&tab_id, TabPatch::title(&title));
                }
            }
        })
        .with_on_page_load_handler(move |event, url| {
            if !matches!(event, PageLoadEvent::Finished) {
                return;
            }
            *load_shown.borrow_mut() = Some(url.clone());
            if let Ok(mut s) = load_state.try_borrow_mut() {
                if let Some(tab) = s.app.tab_manager.get_active_tab() {
                    if tab.url != url {
                        let tab_id = tab.id.clone();
                        s.app.tab_manager.update_tab(&tab_id, TabPatch::url(&url));
                    }
                }
            }
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().ok_or("Failed to get GTK vbox")?;
        builder.build_gtk(vbox)?
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window)?;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        let mut exit = false;
        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => exit = true,

            Event::UserEvent(user_event) => match user_event {
                UserEvent::LoadUrl(url) => {
                    debug!(url = %url, "loading");
                    if let Err(e) = webview.load_url(&url) {
                        error!(url = %url, error = %e, "failed to load url");
                    }
                }
                UserEvent::EvalScript(js) => {
                    if let Err(e) = webview.evaluate_script(&js) {
                        warn!(error = %e, "failed to evaluate chrome script");
                    }
                }
                UserEvent::Window(WindowCommand::Minimize) => window.set_minimized(true),
                UserEvent::Window(WindowCommand::ToggleMaximize) => {
                    window.set_maximized(!window.is_maximized())
                }
                UserEvent::Window(WindowCommand::Close) => exit = true,
                UserEvent::DragWindow => {
                    if let Err(e) = window.drag_window() {
                        debug!(error = %e, "window drag refused");
                    }
                }
                UserEvent::ClearBrowsingData(what) => match webview.clear_all_browsing_data() {
                    Ok(()) => info!(what, "browsing data cleared"),
                    Err(e) => error!(what, error = %e, "failed to clear browsing data"),
                },
            },

            _ => {}
        }

        if exit {
            if let Ok(mut s) = state.try_borrow_mut() {
                let _ = s.app.shutdown();
            }
            *control_flow = ControlFlow::Exit;
        }
    });
}
