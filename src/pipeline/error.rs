use http::StatusCode;
use thiserror::Error;

/// How a refresh cycle ended for its subscribers. Cloned once per subscriber,
/// so the variants carry rendered messages rather than error sources.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The backend refused the refresh token. Terminal: the session has
    /// already been cleared when subscribers see this.
    #[error("refresh rejected: {0}")]
    Rejected(String),

    /// The response on the success path did not match the backend contract.
    /// Treated as tampering; handled like `Rejected`.
    #[error("refresh response tampered: {0}")]
    Tampered(String),

    /// The refresh call itself failed to complete. The refresh token may
    /// still be valid, so the session is left intact.
    #[error("{0}")]
    Transport(String),
}

/// Failure of one request through the authenticated pipeline.
#[derive(Error, Debug)]
pub enum RequestError {
    /// There was no access token to attach. Every call through this client
    /// requires credentials, so this forces a logout.
    #[error("no access token available")]
    NotAuthenticated,

    /// Connection-level failure; never retried, never treated as an auth
    /// problem.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any HTTP error other than 401, propagated unchanged.
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// A well-formed envelope with `status: "error"`.
    #[error("api error: {0}")]
    Api(String),

    /// The refresh cycle this request subscribed to failed.
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// The request kept failing with 401 after the allowed number of
    /// replays. Terminal for this request only; the session survives.
    #[error("max retries getting a new token ({0})")]
    RetryLimit(u32),

    /// The response body could not be decoded into the expected shape.
    #[error("invalid response payload: {0}")]
    Decode(String),
}
