//! Prism: a tabbed desktop browser shell around the platform webview.
//!
//! Entry point: opens the browser window.
//! When built without the `gui` feature, runs a console demo instead.

use std::process::ExitCode;

#[cfg(feature = "gui")]
fn main() -> ExitCode {
    prism::logging::init();
    match prism::ui::webview_app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "failed to start Prism");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "gui"))]
fn main() -> ExitCode {
    use prism::app::App;
    use prism::config::AppConfig;

    prism::logging::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Prism v{} — Demo Mode                    ║", env!("CARGO_PKG_VERSION"));
    println!("║       Build with --features gui to open the browser          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut config = AppConfig::from_env();
    config.data_dir = std::env::temp_dir().join("prism-demo");
    config.remote_filter_lists = false;

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize Prism: {}", e);
            return ExitCode::FAILURE;
        }
    };
    app.startup();

    demo::tabs(&mut app);
    demo::settings(&mut app);
    demo::theme(&mut app);
    demo::bookmarks(&mut app);
    demo::privacy(&mut app);
    demo::address_bar(&app);

    if let Err(e) = app.shutdown() {
        eprintln!("Failed to flush store: {}", e);
        return ExitCode::FAILURE;
    }

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Documents written to {}", app.storage.dir().display());
    println!("═══════════════════════════════════════════════════════════════");
    ExitCode::SUCCESS
}

#[cfg(not(feature = "gui"))]
mod demo {
    use prism::app::App;
    use prism::managers::bookmark_manager::BookmarkManagerTrait;
    use prism::managers::tab_manager::TabManagerTrait;
    use prism::services::privacy_engine::PrivacyEngineTrait;
    use prism::services::settings_engine::SettingsEngineTrait;
    use prism::services::theme_engine::ThemeEngineTrait;
    use prism::types::bookmark::Bookmark;
    use prism::types::privacy::ResourceType;
    use prism::types::tab::TabPatch;
    use prism::ui::view::{normalize_input, TabStripView};

    fn section(name: &str) {
        println!("───────────────────────────────────────────────────────────────");
        println!("  📦 {}", name);
        println!("───────────────────────────────────────────────────────────────");
    }

    pub fn tabs(app: &mut App) {
        section("Tab State Manager");

        let docs = app.tab_manager.add_tab(Some("https://doc.rust-lang.org"));
        app.tab_manager
            .update_tab(&docs, TabPatch::title("The Rust Programming Language"));
        let copy = app.tab_manager.duplicate_tab(&docs);
        println!("  Opened {} tabs, duplicated {} -> {:?}", app.tab_manager.tab_count(), docs, copy);

        app.tab_manager.reorder_tabs(app.tab_manager.tab_count() - 1, 0);
        app.tab_manager.set_active(&docs);

        let strip = TabStripView::from_snapshot(&app.tab_manager.snapshot());
        for item in &strip.tabs {
            println!("  {} {}", if item.active { "▶" } else { " " }, item.title);
        }
        println!("  ✓ TabManager OK");
        println!();
    }

    pub fn settings(app: &mut App) {
        section("Settings Engine");

        let settings = app.settings_engine.get_settings();
        println!("  Startup: {:?}", settings.general.startup_behavior);
        println!("  Search engine: {:?}", settings.general.search_engine);
        println!("  Ad blocker: {}", settings.privacy.ad_blocker_enabled);

        match app
            .settings_engine
            .set_value("general.searchEngine", serde_json::json!("duckduckgo"))
        {
            Ok(()) => println!("  Changed search engine to: {:?}", app.settings_engine.get_settings().general.search_engine),
            Err(e) => println!("  Failed to change search engine: {}", e),
        }
        println!("  ✓ SettingsEngine OK");
        println!();
    }

    pub fn theme(app: &mut App) {
        section("Theme Engine");

        for (name, value) in app.theme_engine.get_css_variables() {
            println!("  {}: {}", name, value);
        }
        if let Err(e) = app.theme_engine.update(&serde_json::json!({"accentColor": "#22d3ee"})) {
            println!("  Failed to update theme: {}", e);
        }
        println!("  Accent color now: {}", app.theme_engine.get_theme().accent_color);
        println!("  ✓ ThemeEngine OK");
        println!();
    }

    pub fn bookmarks(app: &mut App) {
        section("Bookmark Manager");

        let bookmark = Bookmark {
            id: String::new(),
            title: "crates.io".to_string(),
            url: "https://crates.io".to_string(),
            favicon: String::new(),
            folder: String::new(),
        };
        match app.bookmark_manager.add_bookmark(bookmark) {
            Ok(id) => println!("  Added bookmark {}", id),
            Err(e) => println!("  Bookmark not added: {}", e),
        }
        for b in app.bookmark_manager.list_bookmarks() {
            println!("  [{}] {} — {}", b.folder, b.title, b.url);
        }
        println!("  ✓ BookmarkManager OK");
        println!();
    }

    pub fn privacy(app: &mut App) {
        section("Privacy Engine");

        let urls = [
            "https://www.googletagmanager.com/gtm.js",
            "https://ad.doubleclick.net/ddm/ad.js",
            "https://doc.rust-lang.org/std/",
        ];
        for url in urls {
            let blocked = app.privacy_engine.should_block_request(
                url,
                "https://example.com",
                ResourceType::Script,
            );
            println!("  {} {}", if blocked { "✗ blocked" } else { "✓ allowed" }, url);
        }
        let status = app.privacy_engine.status();
        println!("  {} rules, {} requests blocked", status.rules, status.requests_blocked);
        let result = app.privacy_engine.clear_cache(app.host());
        println!("  Clear cache: success={}", result.success);
        println!("  ✓ PrivacyEngine OK");
        println!();
    }

    pub fn address_bar(app: &App) {
        section("Address Bar");

        let general = &app.settings_engine.get_settings().general;
        for input in ["rust-lang.org", "http://localhost:8080", "how do lifetimes work"] {
            if let Some(url) = normalize_input(input, general) {
                println!("  {:<24} -> {}", input, url);
            }
        }
        println!("  ✓ Address bar OK");
        println!();
    }
}
