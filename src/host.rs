//! Host session seam.
//!
//! Browsing-data and window operations belong to the webview host. The GUI
//! forwards them to the `tao` event loop; everywhere else [`HeadlessHost`]
//! stands in and records what was asked of it.

use std::sync::Mutex;

use tracing::info;

use crate::types::errors::HostError;
use crate::types::privacy::WindowCommand;

/// Operations the shell delegates to the host webview and window.
pub trait HostSession {
    fn clear_cache(&self) -> Result<(), HostError>;
    fn clear_cookies(&self) -> Result<(), HostError>;
    fn window(&self, command: WindowCommand) -> Result<(), HostError>;
}

/// A request received by [`HeadlessHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    ClearCache,
    ClearCookies,
    Window(WindowCommand),
}

/// Host used by the bridge binary and by tests.
#[derive(Default)]
pub struct HeadlessHost {
    actions: Mutex<Vec<HostAction>>,
    failure: Option<String>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that records every request and then fails it with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn actions(&self) -> Vec<HostAction> {
        self.actions
            .lock()
            .map(|actions| actions.clone())
            .unwrap_or_default()
    }

    fn record(&self, action: HostAction) -> Result<(), HostError> {
        info!(?action, "host request");
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action);
        }
        match &self.failure {
            Some(message) => Err(HostError::OperationFailed(message.clone())),
            None => Ok(()),
        }
    }
}

impl HostSession for HeadlessHost {
    fn clear_cache(&self) -> Result<(), HostError> {
        self.record(HostAction::ClearCache)
    }

    fn clear_cookies(&self) -> Result<(), HostError> {
        self.record(HostAction::ClearCookies)
    }

    fn window(&self, command: WindowCommand) -> Result<(), HostError> {
        self.record(HostAction::Window(command))
    }
}
