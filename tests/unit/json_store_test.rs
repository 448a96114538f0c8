//! Unit tests for the JSON document store.

use std::fs;

use prism::storage::{JsonStore, StoreKey};
use prism::types::bookmark::{default_bookmarks, Bookmark};
use prism::types::settings::BrowserSettings;
use prism::types::tab::{Tab, DEFAULT_TAB_URL};
use prism::types::theme::Theme;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

fn open() -> (JsonStore, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let store = JsonStore::open(tmp.path()).expect("Failed to open store");
    (store, tmp)
}

#[test]
fn test_open_creates_missing_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("nested").join("prism");
    let store = JsonStore::open(&dir).unwrap();
    assert!(dir.is_dir());
    assert_eq!(store.dir(), dir.as_path());
}

#[rstest]
#[case(StoreKey::Tabs, "tabs.json")]
#[case(StoreKey::Settings, "settings.json")]
#[case(StoreKey::Bookmarks, "bookmarks.json")]
#[case(StoreKey::Theme, "theme.json")]
fn test_open_seeds_default_documents(#[case] key: StoreKey, #[case] file: &str) {
    let (store, tmp) = open();
    assert_eq!(store.path(key), tmp.path().join(file));
    assert!(store.path(key).exists(), "{} should be seeded", file);
}

#[test]
fn test_seeded_documents_hold_defaults() {
    let (store, _tmp) = open();

    let tabs: Vec<Tab> = store.read(StoreKey::Tabs, Vec::new());
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].url, DEFAULT_TAB_URL);
    assert!(tabs[0].active);

    let settings: BrowserSettings = store.read(StoreKey::Settings, BrowserSettings::default());
    assert_eq!(settings, BrowserSettings::default());

    let bookmarks: Vec<Bookmark> = store.read(StoreKey::Bookmarks, Vec::new());
    assert_eq!(bookmarks, default_bookmarks());

    let theme: Theme = store.read(StoreKey::Theme, Theme::default());
    assert_eq!(theme, Theme::default());
}

#[test]
fn test_open_keeps_existing_documents() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("theme.json"), r##"{"primaryColor":"#112233"}"##).unwrap();

    let store = JsonStore::open(tmp.path()).unwrap();
    let theme: Theme = store.read(StoreKey::Theme, Theme::default());
    assert_eq!(theme.primary_color, "#112233");
    assert_eq!(theme.accent_color, Theme::default().accent_color);
}

#[test]
fn test_read_missing_file_returns_default() {
    let (store, _tmp) = open();
    fs::remove_file(store.path(StoreKey::Bookmarks)).unwrap();
    let bookmarks: Vec<Bookmark> = store.read(StoreKey::Bookmarks, Vec::new());
    assert!(bookmarks.is_empty());
    assert!(store.read_value(StoreKey::Bookmarks).unwrap().is_none());
}

#[test]
fn test_read_corrupt_file_returns_default() {
    let (store, _tmp) = open();
    fs::write(store.path(StoreKey::Settings), "{ not json").unwrap();

    assert!(store.read_value(StoreKey::Settings).is_err());
    let settings: BrowserSettings = store.read(StoreKey::Settings, BrowserSettings::default());
    assert_eq!(settings, BrowserSettings::default());
}

#[test]
fn test_read_wrong_shape_returns_default() {
    let (store, _tmp) = open();
    fs::write(store.path(StoreKey::Tabs), r#"{"tabs": "nope"}"#).unwrap();
    let tabs: Vec<Tab> = store.read(StoreKey::Tabs, Vec::new());
    assert!(tabs.is_empty());
}

#[test]
fn test_write_then_read() {
    let (store, _tmp) = open();
    let tabs = vec![Tab::new("https://example.com")];
    store.write(StoreKey::Tabs, &tabs).unwrap();

    let read: Vec<Tab> = store.read(StoreKey::Tabs, Vec::new());
    assert_eq!(read, tabs);
}

#[test]
fn test_write_is_pretty_and_leaves_no_temp_file() {
    let (store, tmp) = open();
    store.write_value(StoreKey::Theme, &json!({"fontFamily": "Fira Sans"})).unwrap();

    let text = fs::read_to_string(store.path(StoreKey::Theme)).unwrap();
    assert!(text.contains('\n'), "expected pretty-printed JSON");
    let leftovers: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_tab_document_uses_plain_field_names() {
    let (store, _tmp) = open();
    let mut tab = Tab::new("https://a");
    tab.favicon = "https://a/favicon.ico".to_string();
    store.write(StoreKey::Tabs, &vec![tab]).unwrap();

    let raw = store.read_value(StoreKey::Tabs).unwrap().unwrap();
    let fields: Vec<&String> = raw[0].as_object().unwrap().keys().collect();
    for name in ["id", "url", "title", "favicon", "active"] {
        assert!(fields.iter().any(|f| f.as_str() == name), "missing field {}", name);
    }
    assert_eq!(fields.len(), 5);
}
