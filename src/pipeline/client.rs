use std::sync::Arc;

use http::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{RefreshError, RequestError};
use super::refresh::{RefreshGate, RefreshOutcome};
use crate::models::{ApiResponse, ApiStatus, PostRefresh};
use crate::session::SessionStore;

/// Upper bound on replays of one original request across refresh cycles.
const MAX_RETRIES: u32 = 5;

/// Header announcing how many times a request has been replayed.
const RETRIED_TIMES: &str = "Retried-Times";

/// HTTP client for the userman API.
///
/// Every request carries the session's bearer token and a JSON content type.
/// A 401 response starts (or joins) a refresh cycle against
/// `POST /api/v1/refresh` and replays the request with the fresh token, at
/// most [`MAX_RETRIES`] times per original request. Concurrent 401s share one
/// refresh call through the [`RefreshGate`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    gate: RefreshGate,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            gate: RefreshGate::new(),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one request through the authenticated pipeline.
    ///
    /// The loop re-enters from the top after every successful refresh, so a
    /// replay that fails with 401 again goes through the full machinery,
    /// including another refresh cycle.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, RequestError> {
        let mut retried: u32 = 0;
        let mut fresh_token: Option<String> = None;

        loop {
            // Every call through this client requires credentials; a missing
            // token means the session is already gone.
            let token = match fresh_token.take().or_else(|| self.session.access_token()) {
                Some(token) => token,
                None => {
                    warn!(path, "no access token for outbound request, forcing logout");
                    self.session.logout().await;
                    return Err(RequestError::NotAuthenticated);
                }
            };

            let mut request = self
                .http
                .request(method.clone(), self.url(path))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json");
            if retried > 0 {
                request = request.header(RETRIED_TIMES, retried);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            // Connection-level failures are not auth failures: propagate
            // unchanged, no refresh.
            let response = request.send().await.map_err(RequestError::Transport)?;

            if response.status() != StatusCode::UNAUTHORIZED {
                if response.status().is_success() {
                    return Ok(response);
                }
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(RequestError::Status { status, body });
            }

            debug!(path, retried, "401 received, joining refresh cycle");

            // The in-flight flag flips inside `join`, before any await, so
            // concurrent 401s queue on this cycle instead of refreshing
            // again.
            let (leader, outcome) = self.gate.join();
            if leader {
                let outcome = self.run_refresh().await;
                self.gate.complete(outcome);
            }

            match outcome.await {
                Ok(Ok(token)) => {
                    if retried >= MAX_RETRIES {
                        warn!(path, "max retries getting a new token");
                        return Err(RequestError::RetryLimit(MAX_RETRIES));
                    }
                    retried += 1;
                    fresh_token = Some(token);
                }
                Ok(Err(e)) => return Err(RequestError::Refresh(e)),
                // The leader never dropped the gate without completing it;
                // this only fires if the cycle itself panicked.
                Err(_) => {
                    return Err(RequestError::Refresh(RefreshError::Transport(
                        "refresh cycle ended without an outcome".to_string(),
                    )))
                }
            }
        }
    }

    /// Runs one refresh call against the backend. Only the cycle leader gets
    /// here; everyone else consumes the outcome through the gate.
    async fn run_refresh(&self) -> RefreshOutcome {
        let (username, refresh_token) =
            match (self.session.username(), self.session.refresh_token()) {
                (Some(username), Some(refresh_token)) => (username, refresh_token),
                _ => {
                    // 401 with no stored refresh credentials: nothing to mint
                    // a new token from.
                    self.session.logout().await;
                    return Err(RefreshError::Rejected(
                        "no refresh credentials in session".to_string(),
                    ));
                }
            };

        debug!(username = %username, "refreshing access token");
        let response = match self
            .http
            .post(self.url("/api/v1/refresh"))
            .json(&serde_json::json!({
                "username": username,
                "refreshToken": refresh_token,
            }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                // The refresh token may still be valid; do not tear the
                // session down over a connection problem.
                return Err(RefreshError::Transport(format!(
                    "refresh request failed: {}",
                    e
                )));
            }
        };

        let status = response.status();
        let raw = match response.text().await {
            Ok(raw) => raw,
            Err(e) => {
                return Err(RefreshError::Transport(format!(
                    "error reading refresh response: {}",
                    e
                )))
            }
        };

        match serde_json::from_str::<ApiResponse<PostRefresh>>(&raw) {
            Ok(envelope) => match (envelope.status, envelope.data) {
                (ApiStatus::Done, Some(data)) => {
                    self.session.set_access_token(&data.access_token).await;
                    Ok(data.access_token)
                }
                (ApiStatus::Error, _) => {
                    let message = envelope
                        .error
                        .unwrap_or_else(|| "refresh rejected".to_string());
                    warn!("refresh rejected by backend: {}", message);
                    self.session.logout().await;
                    Err(RefreshError::Rejected(message))
                }
                (ApiStatus::Done, None) => {
                    // "done" without a token payload breaks the backend
                    // contract; read it as tampering.
                    warn!("refresh reported done without a token payload");
                    self.session.logout().await;
                    Err(RefreshError::Tampered(
                        "refresh reported done without a token".to_string(),
                    ))
                }
            },
            Err(_) if !status.is_success() => {
                // HTTP failure without a well-formed envelope: transient, the
                // session stays.
                Err(RefreshError::Transport(format!(
                    "refresh endpoint returned {}",
                    status
                )))
            }
            Err(e) => {
                warn!("malformed refresh response: {}", e);
                self.session.logout().await;
                Err(RefreshError::Tampered(format!(
                    "malformed refresh response: {}",
                    e
                )))
            }
        }
    }

    /// Decodes the standard envelope, mapping a well-formed error status to
    /// `RequestError::Api`.
    async fn expect_data<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RequestError> {
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| RequestError::Decode(e.to_string()))?;
        match (envelope.status, envelope.data) {
            (ApiStatus::Done, Some(data)) => Ok(data),
            (ApiStatus::Done, None) => Err(RequestError::Decode(
                "response reported done without data".to_string(),
            )),
            (ApiStatus::Error, _) => Err(RequestError::Api(
                envelope
                    .error
                    .unwrap_or_else(|| "unspecified error".to_string()),
            )),
        }
    }

    /// Decodes the envelope status only, for endpoints with no payload.
    async fn expect_done(response: reqwest::Response) -> Result<(), RequestError> {
        let envelope: ApiResponse<Value> = response
            .json()
            .await
            .map_err(|e| RequestError::Decode(e.to_string()))?;
        match envelope.status {
            ApiStatus::Done => Ok(()),
            ApiStatus::Error => Err(RequestError::Api(
                envelope
                    .error
                    .unwrap_or_else(|| "unspecified error".to_string()),
            )),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let response = self.dispatch(Method::GET, path, None).await?;
        Self::expect_data(response).await
    }

    pub async fn get_unit(&self, path: &str) -> Result<(), RequestError> {
        let response = self.dispatch(Method::GET, path, None).await?;
        Self::expect_done(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RequestError> {
        let body = serde_json::to_value(body).map_err(|e| RequestError::Decode(e.to_string()))?;
        let response = self.dispatch(Method::POST, path, Some(&body)).await?;
        Self::expect_data(response).await
    }

    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), RequestError> {
        let body = serde_json::to_value(body).map_err(|e| RequestError::Decode(e.to_string()))?;
        let response = self.dispatch(Method::POST, path, Some(&body)).await?;
        Self::expect_done(response).await
    }

    pub async fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), RequestError> {
        let body = serde_json::to_value(body).map_err(|e| RequestError::Decode(e.to_string()))?;
        let response = self.dispatch(Method::PUT, path, Some(&body)).await?;
        Self::expect_done(response).await
    }

    pub async fn delete_unit(&self, path: &str) -> Result<(), RequestError> {
        let response = self.dispatch(Method::DELETE, path, None).await?;
        Self::expect_done(response).await
    }
}
