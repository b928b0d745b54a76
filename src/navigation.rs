use std::sync::Mutex;

use tracing::info;

use crate::session::SessionStore;

/// Where the UI shell should send the user next.
///
/// The console's router is an external collaborator; this seam is all the
/// session store and pipeline need from it. Login navigates to "/", logout
/// (forced or not) navigates to "/login".
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Default navigator for headless runs: only traces the transition.
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, path: &str) {
        info!(path, "navigation requested");
    }
}

/// Records requested transitions instead of performing them. Used by tests
/// and by embedders that drive their own router.
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().expect("navigator lock poisoned").clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visited
            .lock()
            .expect("navigator lock poisoned")
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited
            .lock()
            .expect("navigator lock poisoned")
            .push(path.to_string());
    }
}

/// Route guard consulted before entering any route: everything not on the
/// public allowlist requires an authenticated session.
pub struct RouteGuard {
    public: Vec<String>,
}

impl RouteGuard {
    /// `public` entries match exactly, or by prefix when they end in '*'.
    pub fn new(public: Vec<String>) -> Self {
        RouteGuard { public }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|entry| match entry.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => entry == path,
        })
    }

    /// Returns the redirect target if entry must be refused.
    pub fn check(&self, path: &str, session: &SessionStore) -> Option<&'static str> {
        if self.is_public(path) || session.is_authenticated() {
            None
        } else {
            Some("/login")
        }
    }
}
