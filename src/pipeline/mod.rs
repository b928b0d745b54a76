pub mod client;
pub mod error;
pub mod refresh;

// Re-export the primary pipeline items so code outside can do
// "use crate::pipeline::{ApiClient, RequestError};"
pub use client::ApiClient;
pub use error::{RefreshError, RequestError};
pub use refresh::{RefreshGate, RefreshOutcome};
