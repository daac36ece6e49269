//! Redirect side effects
//!
//! When a session cannot be recovered the caller is sent to the login entry
//! point. Where that goes (a browser location, a CLI message, a test log) is
//! up to the `Navigator` the client was built with.

use std::sync::Mutex;
use tracing::warn;

/// Receives redirects to the login entry point
pub trait Navigator: Send + Sync {
    /// Navigate away from the current view to `target`
    fn redirect(&self, target: &str);
}

/// Logs redirects and does nothing else
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect(&self, target: &str) {
        warn!(target_path = target, "Session lost, redirecting to login");
    }
}

/// Remembers every redirect it receives
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Redirect targets received so far, oldest first
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Most recent redirect target
    pub fn last(&self) -> Option<String> {
        self.redirects().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, target: &str) {
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(target.to_string());
        }
    }
}
