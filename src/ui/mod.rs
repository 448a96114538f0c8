//! Prism UI layer.
//!
//! Uses `wry` for cross-platform WebView rendering:
//! - Windows: WebView2
//! - Linux: WebKitGTK
//! - macOS: WKWebView
//!
//! The browser chrome (tab strip, navigation bar, bookmarks bar, panels) is
//! HTML/CSS/JS injected into the same WebView as the page. `view` builds the
//! data the chrome renders; `webview_app` runs the window.

pub mod view;

#[cfg(feature = "gui")]
pub mod webview_app;
