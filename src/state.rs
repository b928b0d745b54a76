//! Shared console state.
//!
//! Contains the state the UI layer holds on to for the lifetime of the
//! process: configuration, session store, route guard, and the authenticated
//! API client.

use std::sync::Arc;

use crate::config::ConfigV1;
use crate::navigation::RouteGuard;
use crate::pipeline::ApiClient;
use crate::session::SessionStore;

/// Console state shared across all UI collaborators.
#[derive(Clone)]
pub struct AppState {
    /// Console configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Identity/token state, synchronized with persistent storage.
    pub session: Arc<SessionStore>,
    /// HTTP client carrying the refresh-and-replay pipeline.
    pub client: Arc<ApiClient>,
    /// Authentication check consulted before entering any route.
    pub guard: Arc<RouteGuard>,
}
