use serde::{Deserialize, Serialize};

use crate::permissions::RoleItems;

/// The envelope every userman endpoint wraps its payload in.
///
/// `status` is always present; exactly one of `data` and `error` accompanies
/// it on a well-behaved backend. Anything else is treated as tampering by the
/// refresh pipeline.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// serde's derived Default bound would require T: Default; data is just absent.
fn none<T>() -> Option<T> {
    None
}

/// The two status strings the backend emits.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Done,
    Error,
}

/// Payload of a successful `POST /api/v1/login`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostLogin {
    pub access_token: String,
    pub refresh_token: String,
    pub permissions: RoleItems,
}

/// Payload of a successful `POST /api/v1/refresh`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostRefresh {
    pub access_token: String,
}
