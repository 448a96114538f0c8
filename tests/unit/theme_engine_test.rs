//! Unit tests for the theme engine.

use std::fs;
use std::sync::Arc;

use prism::services::theme_engine::{ThemeEngine, ThemeEngineTrait};
use prism::storage::{Storage, StoreKey};
use prism::types::errors::ThemeError;
use prism::types::theme::Theme;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;
use tokio::runtime::Runtime;

fn setup() -> (ThemeEngine, Arc<Storage>, Runtime, TempDir) {
    let rt = Runtime::new().expect("Failed to build runtime");
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let storage = Arc::new(Storage::open(tmp.path(), rt.handle()).unwrap());
    let mut engine = ThemeEngine::new(storage.clone());
    engine.load();
    (engine, storage, rt, tmp)
}

#[test]
fn test_default_theme() {
    let (engine, _storage, _rt, _tmp) = setup();
    let theme = engine.get_theme();
    assert_eq!(theme.primary_color, "#8b5cf6");
    assert_eq!(theme.background_color, "#0a0a0f");
    assert_eq!(theme.accent_color, "#ec4899");
    assert_eq!(theme.font_family, "Inter");
    assert!(theme.blur_enabled);
}

#[test]
fn test_load_merges_over_defaults() {
    let rt = Runtime::new().unwrap();
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("theme.json"), r#"{"blurEnabled": false}"#).unwrap();
    let storage = Arc::new(Storage::open(tmp.path(), rt.handle()).unwrap());
    let mut engine = ThemeEngine::new(storage);

    let theme = engine.load().clone();
    assert!(!theme.blur_enabled);
    assert_eq!(theme.primary_color, "#8b5cf6");
}

#[test]
fn test_update_changes_only_given_fields() {
    let (mut engine, storage, _rt, _tmp) = setup();
    engine.update(&json!({"primaryColor": "#123456"})).unwrap();

    assert_eq!(engine.get_theme().primary_color, "#123456");
    assert_eq!(engine.get_theme().accent_color, "#ec4899");
    let stored: Theme = storage.get(StoreKey::Theme, Theme::default());
    assert_eq!(&stored, engine.get_theme());
}

#[rstest]
#[case(json!({"primaryColor": "purple"}))]
#[case(json!({"backgroundColor": "#12"}))]
#[case(json!({"accentColor": "#zzzzzz"}))]
fn test_update_rejects_invalid_colors(#[case] patch: serde_json::Value) {
    let (mut engine, _storage, _rt, _tmp) = setup();
    let err = engine.update(&patch).unwrap_err();
    assert!(matches!(err, ThemeError::InvalidColor(_)));
    assert_eq!(engine.get_theme(), &Theme::default());
}

#[test]
fn test_update_rejects_wrong_types() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    let err = engine.update(&json!({"blurEnabled": "yes"})).unwrap_err();
    assert!(matches!(err, ThemeError::InvalidDocument(_)));
}

#[test]
fn test_replace_validates() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    let bad = Theme {
        accent_color: "pink".to_string(),
        ..Theme::default()
    };
    assert!(engine.replace(bad).is_err());

    let good = Theme {
        accent_color: "#fff".to_string(),
        ..Theme::default()
    };
    engine.replace(good.clone()).unwrap();
    assert_eq!(engine.get_theme(), &good);
}

#[test]
fn test_export_then_import_into_fresh_engine() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    engine
        .update(&json!({"fontFamily": "JetBrains Mono", "blurEnabled": false}))
        .unwrap();
    let exported = engine.export_theme();
    assert!(exported.contains("\"fontFamily\": \"JetBrains Mono\""));

    let (mut other, _s2, _rt2, _tmp2) = setup();
    other.import_theme(&exported).unwrap();
    assert_eq!(other.get_theme(), engine.get_theme());
}

#[test]
fn test_import_partial_document_keeps_current_values() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    engine.import_theme(r##"{"accentColor": "#00ffaa"}"##).unwrap();
    assert_eq!(engine.get_theme().accent_color, "#00ffaa");
    assert_eq!(engine.get_theme().font_family, "Inter");
}

#[test]
fn test_import_rejects_garbage() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    assert!(matches!(engine.import_theme("theme!"), Err(ThemeError::InvalidDocument(_))));
    assert!(matches!(engine.import_theme("42"), Err(ThemeError::InvalidDocument(_))));
}

#[test]
fn test_css_variables() {
    let (mut engine, _storage, _rt, _tmp) = setup();
    let vars = engine.get_css_variables();
    assert_eq!(vars["--color-primary"], "#8b5cf6");
    assert_eq!(vars["--color-background"], "#0a0a0f");
    assert_eq!(vars["--color-accent"], "#ec4899");
    assert_eq!(vars["--font-family"], "Inter");
    assert_eq!(vars["--blur-enabled"], "1");

    engine.update(&json!({"blurEnabled": false})).unwrap();
    assert_eq!(engine.get_css_variables()["--blur-enabled"], "0");
}
