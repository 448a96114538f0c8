//! Unit tests for the settings engine.

use std::fs;
use std::sync::Arc;

use prism::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use prism::storage::{Storage, StoreKey};
use prism::types::errors::SettingsError;
use prism::types::settings::{BrowserSettings, SearchEngine, StartupBehavior};
use rstest::rstest;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::runtime::Runtime;

fn setup() -> (SettingsEngine, Arc<Storage>, Runtime, TempDir) {
    let rt = Runtime::new().expect("Failed to build runtime");
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let storage = Arc::new(Storage::open(tmp.path(), rt.handle()).unwrap());
    let mut engine = SettingsEngine::new(storage.clone());
    engine.load();
    (engine, storage, rt, tmp)
}

fn on_disk(tmp: &TempDir) -> Value {
    let text = fs::read_to_string(tmp.path().join("settings.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_defaults() {
    let (engine, _storage, _rt, _tmp) = setup();
    let s = engine.get_settings();
    assert_eq!(s.general.startup_behavior, StartupBehavior::Restore);
    assert_eq!(s.general.startup_pages, vec!["https://www.google.com".to_string()]);
    assert_eq!(s.general.search_engine, SearchEngine::Google);
    assert!(s.appearance.animations_enabled);
    assert_eq!(s.appearance.border_radius, 8);
    assert_eq!(s.performance.max_cpu_percent, 80);
    assert_eq!(s.performance.max_ram_percent, 70);
    assert!(!s.performance.auto_close_inactive_tabs);
    assert_eq!(s.performance.inactive_tab_timeout, 30);
    assert!(s.privacy.ad_blocker_enabled);
}

#[test]
fn test_serialized_names_are_camel_case() {
    let value = serde_json::to_value(BrowserSettings::default()).unwrap();
    assert_eq!(value["general"]["startupBehavior"], "restore");
    assert_eq!(value["general"]["searchEngine"], "google");
    assert_eq!(value["general"]["customSearchUrl"], Value::Null);
    assert_eq!(value["privacy"]["adBlockerEnabled"], true);
    assert_eq!(value["performance"]["inactiveTabTimeout"], 30);
}

#[test]
fn test_load_merges_partial_document_over_defaults() {
    let rt = Runtime::new().unwrap();
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("settings.json"),
        r#"{"general": {"searchEngine": "duckduckgo"}, "privacy": {}}"#,
    )
    .unwrap();
    let storage = Arc::new(Storage::open(tmp.path(), rt.handle()).unwrap());
    let mut engine = SettingsEngine::new(storage);

    let s = engine.load().clone();
    assert_eq!(s.general.search_engine, SearchEngine::DuckDuckGo);
    assert_eq!(s.general.startup_behavior, StartupBehavior::Restore);
    assert_eq!(s.appearance, BrowserSettings::default().appearance);
    assert!(s.privacy.ad_blocker_enabled);
}

#[test]
fn test_load_corrupt_document_yields_defaults() {
    let rt = Runtime::new().unwrap();
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("settings.json"), "][").unwrap();
    let storage = Arc::new(Storage::open(tmp.path(), rt.handle()).unwrap());
    let mut engine = SettingsEngine::new(storage);
    assert_eq!(engine.load(), &BrowserSettings::default());
}

#[rstest]
#[case("general.searchEngine", json!("duckduckgo"))]
#[case("general.startupBehavior", json!("new-tab"))]
#[case("general.customSearchUrl", json!("https://search.example/?q=%s"))]
#[case("appearance.borderRadius", json!(12))]
#[case("performance.autoCloseInactiveTabs", json!(true))]
#[case("privacy.adBlockerEnabled", json!(false))]
fn test_set_value_persists(#[case] key: &str, #[case] value: Value) {
    let (mut engine, storage, _rt, tmp) = setup();
    engine.set_value(key, value.clone()).unwrap();
    storage.flush_blocking().unwrap();

    let disk = on_disk(&tmp);
    let saved = key.split('.').fold(&disk, |node, part| &node[part]);
    assert_eq!(saved, &value);
}

#[test]
fn test_set_value_unknown_key() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    let err = engine.set_value("general.nonexistent", json!(1)).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));
}

#[test]
fn test_set_value_empty_key() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    assert!(matches!(engine.set_value("", json!(1)), Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_set_value_through_non_object() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    let err = engine.set_value("appearance.borderRadius.deep", json!(1)).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));
}

#[test]
fn test_set_value_wrong_type_leaves_settings_unchanged() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    let err = engine.set_value("general.searchEngine", json!("altavista")).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(_)));
    assert_eq!(engine.get_settings(), &BrowserSettings::default());
}

#[test]
fn test_update_deep_merges() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    engine
        .update(&json!({"appearance": {"showBookmarksBar": false}}))
        .unwrap();
    let s = engine.get_settings();
    assert!(!s.appearance.show_bookmarks_bar);
    assert!(s.appearance.animations_enabled);
    assert_eq!(s.appearance.border_radius, 8);
}

#[test]
fn test_update_requires_object() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    assert!(matches!(engine.update(&json!([1, 2])), Err(SettingsError::InvalidValue(_))));
}

#[test]
fn test_ad_blocker_flag_persists() {
    let (mut engine, storage, _rt, tmp) = setup();
    engine.set_ad_blocker_enabled(false);
    storage.flush_blocking().unwrap();
    assert_eq!(on_disk(&tmp)["privacy"]["adBlockerEnabled"], false);
}

#[test]
fn test_reset_restores_defaults() {
    let (mut engine, storage, _rt, _tmp) = setup();
    engine.set_value("appearance.borderRadius", json!(2)).unwrap();
    engine.reset();
    assert_eq!(engine.get_settings(), &BrowserSettings::default());

    let stored: BrowserSettings = storage.get(StoreKey::Settings, BrowserSettings::default());
    assert_eq!(stored, BrowserSettings::default());
}
