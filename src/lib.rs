//! Prism: a tabbed desktop browser shell around the platform webview.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod bridge;
pub mod config;
pub mod host;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod storage;
pub mod types;
pub mod ui;
