use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use super::storage::StorageBackend;
use crate::navigation::Navigator;
use crate::permissions::RoleItems;

pub const KEY_USERNAME: &str = "username";
pub const KEY_ACCESS_TOKEN: &str = "accessToken";
pub const KEY_REFRESH_TOKEN: &str = "refreshToken";
pub const KEY_PERMISSIONS: &str = "permissions";

const SESSION_KEYS: [&str; 4] = [
    KEY_USERNAME,
    KEY_ACCESS_TOKEN,
    KEY_REFRESH_TOKEN,
    KEY_PERMISSIONS,
];

/// The credential payload handed to `login` after the backend accepted the
/// user's credentials. The caller validates it; there is no error path here.
#[derive(Clone, Debug)]
pub struct Login {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub permissions: RoleItems,
}

#[derive(Default)]
struct SessionState {
    username: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    permissions: Option<RoleItems>,
    /// Which backend holds the current session. Decided at login (or derived
    /// once at restore) instead of re-probing storage on every write.
    persist_durable: bool,
}

/// Holds the current identity/token state and keeps it in sync with the two
/// storage backends. The UI and the request pipeline only read it or call its
/// mutators; nothing else owns session state.
pub struct SessionStore {
    durable: Arc<dyn StorageBackend>,
    ephemeral: Arc<dyn StorageBackend>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Builds the store by reading any persisted session, preferring the
    /// ephemeral backend over the durable one for each key independently.
    pub async fn restore(
        durable: Arc<dyn StorageBackend>,
        ephemeral: Arc<dyn StorageBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let mut ephemeral_holds_session = false;
        for key in SESSION_KEYS {
            if ephemeral.get(key).await.is_some() {
                ephemeral_holds_session = true;
                break;
            }
        }

        let username = read_key(&ephemeral, &durable, KEY_USERNAME).await;
        let access_token = read_key(&ephemeral, &durable, KEY_ACCESS_TOKEN).await;
        let refresh_token = read_key(&ephemeral, &durable, KEY_REFRESH_TOKEN).await;
        let permissions = match read_key(&ephemeral, &durable, KEY_PERMISSIONS).await {
            Some(raw) => match RoleItems::from_json(&raw) {
                Ok(permissions) => Some(permissions),
                Err(e) => {
                    warn!("Discarding stored permissions: {}", e);
                    None
                }
            },
            None => None,
        };

        let state = SessionState {
            username,
            access_token,
            refresh_token,
            permissions,
            persist_durable: !ephemeral_holds_session,
        };

        SessionStore {
            durable,
            ephemeral,
            navigator,
            state: RwLock::new(state),
        }
    }

    /// Establishes a session: writes all four fields to the backend selected
    /// by `persist_durable`, updates the in-memory state, and navigates to
    /// the application root.
    pub async fn login(&self, login: Login, persist_durable: bool) {
        let target = if persist_durable {
            &self.durable
        } else {
            &self.ephemeral
        };

        // A failed write degrades to an in-memory session; it does not fail
        // the login.
        for (key, value) in [
            (KEY_USERNAME, login.username.as_str()),
            (KEY_ACCESS_TOKEN, login.access_token.as_str()),
            (KEY_REFRESH_TOKEN, login.refresh_token.as_str()),
        ] {
            if let Err(e) = target.set(key, value).await {
                warn!("Failed to persist session key '{}': {}", key, e);
            }
        }
        match login.permissions.to_json() {
            Ok(raw) => {
                if let Err(e) = target.set(KEY_PERMISSIONS, &raw).await {
                    warn!("Failed to persist session key '{}': {}", KEY_PERMISSIONS, e);
                }
            }
            Err(e) => warn!("Failed to encode permissions for storage: {}", e),
        }

        {
            let mut state = self.state.write().expect("session state lock poisoned");
            state.username = Some(login.username.clone());
            state.access_token = Some(login.access_token);
            state.refresh_token = Some(login.refresh_token);
            state.permissions = Some(login.permissions);
            state.persist_durable = persist_durable;
        }

        info!(
            username = %login.username,
            durable = persist_durable,
            "session established"
        );
        self.navigator.navigate("/");
    }

    /// Tears the session down: nulls the in-memory state, wipes both storage
    /// backends entirely (co-located keys included), and navigates to the
    /// login page. Idempotent.
    pub async fn logout(&self) {
        {
            let mut state = self.state.write().expect("session state lock poisoned");
            *state = SessionState::default();
        }

        if let Err(e) = self.ephemeral.clear().await {
            warn!("Failed to clear ephemeral storage: {}", e);
        }
        if let Err(e) = self.durable.clear().await {
            warn!("Failed to clear durable storage: {}", e);
        }

        info!("session cleared");
        self.navigator.navigate("/login");
    }

    /// Replaces only the access token, in memory and in whichever backend
    /// holds the current session. Used exclusively by the refresh flow.
    pub async fn set_access_token(&self, token: &str) {
        let persist_durable = {
            let mut state = self.state.write().expect("session state lock poisoned");
            state.access_token = Some(token.to_string());
            state.persist_durable
        };

        let target = if persist_durable {
            &self.durable
        } else {
            &self.ephemeral
        };
        if let Err(e) = target.set(KEY_ACCESS_TOKEN, token).await {
            warn!("Failed to persist refreshed access token: {}", e);
        }
    }

    /// True iff username, access token, refresh token, and permissions are
    /// all present.
    pub fn is_authenticated(&self) -> bool {
        let state = self.state.read().expect("session state lock poisoned");
        state.username.is_some()
            && state.access_token.is_some()
            && state.refresh_token.is_some()
            && state.permissions.is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.state
            .read()
            .expect("session state lock poisoned")
            .username
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .expect("session state lock poisoned")
            .access_token
            .clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state
            .read()
            .expect("session state lock poisoned")
            .refresh_token
            .clone()
    }

    pub fn permissions(&self) -> Option<RoleItems> {
        self.state
            .read()
            .expect("session state lock poisoned")
            .permissions
            .clone()
    }
}

async fn read_key(
    ephemeral: &Arc<dyn StorageBackend>,
    durable: &Arc<dyn StorageBackend>,
    key: &str,
) -> Option<String> {
    match ephemeral.get(key).await {
        Some(value) => Some(value),
        None => durable.get(key).await,
    }
}
