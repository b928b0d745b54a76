//! Typed wrappers over the `/api/v1` endpoints. Everything except `sessions`
//! goes through the authenticated pipeline, so any of these calls can trigger
//! a token refresh.
pub mod apps;
pub mod roles;
pub mod sessions;
pub mod users;
