use thiserror::Error;

// === StoreError ===

/// Errors raised by the JSON document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or renaming a store file failed.
    #[error("Store I/O error: {0}")]
    IoError(String),
    /// A document could not be serialized or parsed.
    #[error("Store serialization error: {0}")]
    SerializationError(String),
    /// The background writer is no longer running.
    #[error("Store writer stopped")]
    WriterClosed,
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === ThemeError ===

/// Errors related to theme engine operations.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The provided color value is invalid.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    /// An imported or patched theme document could not be parsed.
    #[error("Invalid theme document: {0}")]
    InvalidDocument(String),
}

// === BookmarkError ===

/// Errors related to bookmark management operations.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The bookmark URL is empty or not a web URL.
    #[error("Invalid bookmark URL: {0}")]
    InvalidUrl(String),
    /// A bookmark with the same URL already exists.
    #[error("Duplicate bookmark URL: {0}")]
    DuplicateUrl(String),
}

// === PrivacyError ===

/// Errors related to the ad blocker and filter lists.
#[derive(Debug, Error)]
pub enum PrivacyError {
    /// Downloading or reading a filter list failed.
    #[error("Filter list error: {0}")]
    FilterListError(String),
}

// === HostError ===

/// Errors reported by the host webview / window layer.
#[derive(Debug, Error)]
pub enum HostError {
    /// The event loop that owns the window has shut down.
    #[error("Host event loop closed")]
    EventLoopClosed,
    /// The host rejected or failed the requested operation.
    #[error("Host operation failed: {0}")]
    OperationFailed(String),
}

// === AppError ===

/// Fatal errors during application startup.
#[derive(Debug, Error)]
pub enum AppError {
    /// The async runtime could not be started.
    #[error("Failed to start runtime: {0}")]
    Runtime(String),
    /// The data directory could not be prepared.
    #[error(transparent)]
    Store(#[from] StoreError),
}
