//! Unit tests for the background store writer and the `Storage` facade.
//!
//! These run on plain `#[test]` threads: `flush_blocking` must not be called
//! from inside the runtime.

use std::sync::Arc;

use prism::managers::tab_manager::TabStore;
use prism::storage::{JsonStore, Storage, StoreKey, StoreWriter};
use prism::types::tab::Tab;
use prism::types::theme::Theme;
use serde_json::json;
use tempfile::TempDir;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

#[test]
fn test_flush_writes_scheduled_document() {
    let rt = runtime();
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::open(tmp.path()).unwrap());
    let writer = StoreWriter::spawn(store.clone(), rt.handle());

    writer.schedule(StoreKey::Theme, json!({"primaryColor": "#000000"}));
    writer.flush_blocking().unwrap();

    let value = store.read_value(StoreKey::Theme).unwrap().unwrap();
    assert_eq!(value, json!({"primaryColor": "#000000"}));
    assert!(writer.pending(StoreKey::Theme).is_none());
}

#[test]
fn test_rapid_writes_collapse_to_latest() {
    let rt = runtime();
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::open(tmp.path()).unwrap());
    let writer = StoreWriter::spawn(store.clone(), rt.handle());

    for i in 0..200 {
        writer.schedule(StoreKey::Tabs, json!([{"id": i.to_string(), "url": "https://a", "title": "A", "active": true}]));
    }
    writer.flush_blocking().unwrap();

    let tabs: Vec<Tab> = store.read(StoreKey::Tabs, Vec::new());
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].id, "199");
}

#[test]
fn test_keys_are_written_independently() {
    let rt = runtime();
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::open(tmp.path()).unwrap());
    let writer = StoreWriter::spawn(store.clone(), rt.handle());

    writer.schedule(StoreKey::Theme, json!({"fontFamily": "Fira Sans"}));
    writer.schedule(StoreKey::Bookmarks, json!([]));
    writer.flush_blocking().unwrap();

    assert_eq!(store.read_value(StoreKey::Theme).unwrap().unwrap(), json!({"fontFamily": "Fira Sans"}));
    assert_eq!(store.read_value(StoreKey::Bookmarks).unwrap().unwrap(), json!([]));
}

#[test]
fn test_async_flush() {
    let rt = runtime();
    let tmp = TempDir::new().unwrap();
    let storage = Storage::open(tmp.path(), rt.handle()).unwrap();

    storage.save(StoreKey::Bookmarks, &Vec::<u8>::new());
    rt.block_on(storage.flush()).unwrap();

    let raw = std::fs::read_to_string(tmp.path().join("bookmarks.json")).unwrap();
    assert_eq!(raw.trim(), "[]");
}

#[test]
fn test_storage_reads_its_own_writes() {
    let rt = runtime();
    let tmp = TempDir::new().unwrap();
    let storage = Storage::open(tmp.path(), rt.handle()).unwrap();

    let theme = Theme {
        accent_color: "#00ff00".to_string(),
        ..Theme::default()
    };
    storage.save(StoreKey::Theme, &theme);
    // Visible immediately, whether or not the write has landed yet.
    assert_eq!(storage.get(StoreKey::Theme, Theme::default()), theme);

    storage.flush_blocking().unwrap();
    assert_eq!(storage.get(StoreKey::Theme, Theme::default()), theme);
}

#[test]
fn test_storage_survives_reopen() {
    let rt = runtime();
    let tmp = TempDir::new().unwrap();
    let tabs = vec![Tab::new("https://example.com"), Tab::new("https://rust-lang.org")];
    {
        let storage = Storage::open(tmp.path(), rt.handle()).unwrap();
        storage.save_tabs(&tabs);
        storage.flush_blocking().unwrap();
    }

    let reopened = Storage::open(tmp.path(), rt.handle()).unwrap();
    assert_eq!(reopened.load_tabs(), tabs);
}

#[test]
fn test_flush_with_nothing_scheduled() {
    let rt = runtime();
    let tmp = TempDir::new().unwrap();
    let storage = Storage::open(tmp.path(), rt.handle()).unwrap();
    assert!(storage.flush_blocking().is_ok());
}
