use serde::Serialize;
use tracing::info;

use crate::models::{ApiResponse, ApiStatus, PostLogin};
use crate::pipeline::RequestError;
use crate::session::{Login, SessionStore};

/// Request payload for `POST /api/v1/login`.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

/// Authenticates against the backend and establishes the local session.
///
/// This is the one call that bypasses the authenticated pipeline: there is no
/// token to attach yet. `remember` selects the durable backend so the session
/// survives a restart.
pub async fn login(
    base_url: &str,
    session: &SessionStore,
    credentials: &Credentials,
    remember: bool,
) -> Result<(), RequestError> {
    let url = format!("{}/api/v1/login", base_url.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .json(credentials)
        .send()
        .await
        .map_err(RequestError::Transport)?;

    let envelope: ApiResponse<PostLogin> = response
        .json()
        .await
        .map_err(|e| RequestError::Decode(e.to_string()))?;

    match (envelope.status, envelope.data) {
        (ApiStatus::Done, Some(data)) => {
            info!(username = %credentials.username, "login accepted");
            session
                .login(
                    Login {
                        username: credentials.username.clone(),
                        access_token: data.access_token,
                        refresh_token: data.refresh_token,
                        permissions: data.permissions,
                    },
                    remember,
                )
                .await;
            Ok(())
        }
        (ApiStatus::Done, None) => Err(RequestError::Decode(
            "login reported done without a payload".to_string(),
        )),
        (ApiStatus::Error, _) => Err(RequestError::Api(
            envelope
                .error
                .unwrap_or_else(|| "invalid credentials".to_string()),
        )),
    }
}
