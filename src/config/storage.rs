use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the durable half of the session storage lives. The ephemeral half is
/// always an in-process map, so it only exists here implicitly.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct StorageConfig {
    #[serde(flatten)]
    pub durable: DurableBackend,
}

/// The available durable backends. We differentiate them via a "type" tag in
/// the YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
#[serde(tag = "type")]
pub enum DurableBackend {
    /// A JSON key-value file; survives restarts.
    #[serde(rename = "file")]
    File(FileStorageConfig),
    /// In-process only. Useful for tests and one-shot runs; sessions are lost
    /// when the process exits.
    #[serde(rename = "memory")]
    Memory,
}

#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct FileStorageConfig {
    pub path: String,
}
