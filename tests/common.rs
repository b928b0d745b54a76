use std::sync::Arc;

use userman_console::navigation::RecordingNavigator;
use userman_console::permissions::{DataValue, Item, RoleItems, Value};
use userman_console::pipeline::ApiClient;
use userman_console::session::{Login, MemoryStorage, SessionStore};

/// An isolated console core wired against in-memory storage and a recording
/// navigator, pointed at a test server.
pub struct TestConsole {
    pub session: Arc<SessionStore>,
    pub client: Arc<ApiClient>,
    pub navigator: Arc<RecordingNavigator>,
    pub durable: Arc<MemoryStorage>,
    pub ephemeral: Arc<MemoryStorage>,
}

pub async fn build_console(base_url: &str) -> TestConsole {
    let durable = Arc::new(MemoryStorage::new());
    let ephemeral = Arc::new(MemoryStorage::new());
    let navigator = Arc::new(RecordingNavigator::new());

    let session = Arc::new(
        SessionStore::restore(durable.clone(), ephemeral.clone(), navigator.clone()).await,
    );
    let client = Arc::new(ApiClient::new(base_url, session.clone()));

    TestConsole {
        session,
        client,
        navigator,
        durable,
        ephemeral,
    }
}

pub fn sample_permissions() -> RoleItems {
    RoleItems::new(vec![Item {
        name: "users".to_string(),
        values: vec![Value {
            name: "manage".to_string(),
            data: DataValue::Boolean(true),
            options: None,
        }],
        items: vec![],
    }])
}

/// Logs "alice" in with tokens t1/r1. `persist_durable` selects the backend.
pub async fn establish_session(console: &TestConsole, persist_durable: bool) {
    console
        .session
        .login(
            Login {
                username: "alice".to_string(),
                access_token: "t1".to_string(),
                refresh_token: "r1".to_string(),
                permissions: sample_permissions(),
            },
            persist_durable,
        )
        .await;
}
