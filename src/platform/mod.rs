// Prism platform paths
// Resolves the per-user directories the browser keeps its documents in.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "prism";

/// Returns the platform-specific data directory for Prism.
///
/// - **Linux**: `~/.local/share/prism` (or `$XDG_DATA_HOME/prism`)
/// - **macOS**: `~/Library/Application Support/prism`
/// - **Windows**: `%APPDATA%\prism`
///
/// Falls back to `./prism` when the platform reports no data directory.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
