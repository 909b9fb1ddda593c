//! Navigation side effects for auth flows.

use std::sync::{Mutex, PoisonError};

/// Redirect hook invoked on logout and failed auth guards.
///
/// The session controller never decides how navigation happens; embedders
/// plug in whatever their surface supports.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Drops all redirects, for headless use.
#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _path: &str) {}
}

/// Records redirect targets instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths navigated to, in order.
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
