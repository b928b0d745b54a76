//! Console core wiring.
//!
//! This module builds the pieces the UI layer works against: storage
//! backends, the restored session store, the route guard, and the
//! authenticated API client.

use std::sync::Arc;

use tracing::info;

use crate::config::ConfigV1;
use crate::navigation::{LoggingNavigator, Navigator, RouteGuard};
use crate::pipeline::ApiClient;
use crate::session::{create_storage, MemoryStorage, SessionStore, StorageBackend};
use crate::state::AppState;

/// Builds the console core with the default (log-only) navigator.
pub async fn build(config: Arc<ConfigV1>) -> AppState {
    build_with_navigator(config, Arc::new(LoggingNavigator)).await
}

/// Builds the console core around a caller-supplied navigator, so embedders
/// can wire in their own router.
pub async fn build_with_navigator(config: Arc<ConfigV1>, navigator: Arc<dyn Navigator>) -> AppState {
    let durable = create_storage(&config.storage);
    let ephemeral: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());

    let session = Arc::new(SessionStore::restore(durable, ephemeral, navigator).await);
    info!(
        authenticated = session.is_authenticated(),
        "session store ready"
    );

    let client = Arc::new(ApiClient::new(config.api.base_url.clone(), session.clone()));
    let guard = Arc::new(RouteGuard::new(config.routes.public.clone()));

    AppState {
        config,
        session,
        client,
        guard,
    }
}
