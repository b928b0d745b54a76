use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::{DurableBackend, StorageConfig};

/// A string key-value namespace holding session state, the analogue of one
/// browser storage area. Two instances exist side by side: a durable one that
/// survives restarts and an ephemeral one that does not.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str) -> Result<(), String>;
    async fn remove(&self, key: &str) -> Result<(), String>;
    /// Every key currently present, in no particular order.
    async fn keys(&self) -> Vec<String>;
    /// Drops every key in the namespace, session-related or not.
    async fn clear(&self) -> Result<(), String>;
}

/// Creates the durable storage backend based on the StorageConfig.
pub fn create_storage(config: &StorageConfig) -> Arc<dyn StorageBackend> {
    match &config.durable {
        DurableBackend::File(file_config) => match FileStorage::new(&file_config.path) {
            Ok(storage) => {
                info!(path = %file_config.path, "Using file-backed durable session storage.");
                Arc::new(storage)
            }
            Err(e) => {
                error!("Failed to open durable session storage: {}", e);
                std::process::exit(1);
            }
        },
        DurableBackend::Memory => {
            info!("Durable storage configured as memory; sessions will not survive a restart.");
            Arc::new(MemoryStorage::new())
        }
    }
}

/// In-process map, cleared when the process ends. Serves as the ephemeral
/// namespace, and as the durable one in tests.
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), String> {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .remove(key);
        Ok(())
    }

    async fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    async fn clear(&self) -> Result<(), String> {
        self.entries.write().expect("storage lock poisoned").clear();
        Ok(())
    }
}

/// Durable backend: a JSON object of string entries, written through on every
/// mutation.
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Loads existing entries from `path`; a missing file is an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, String> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| format!("Error parsing storage file {}: {}", path.display(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(format!(
                    "Error reading storage file {}: {}",
                    path.display(),
                    e
                ))
            }
        };

        Ok(FileStorage {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self) -> Result<(), String> {
        // Snapshot under the lock; never hold it across the write below.
        let snapshot = self.entries.read().expect("storage lock poisoned").clone();
        let raw = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("Error serializing storage: {}", e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| format!("Error creating storage directory: {}", e))?;
            }
        }
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| format!("Error writing storage file {}: {}", self.path.display(), e))
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
        self.persist().await
    }

    async fn remove(&self, key: &str) -> Result<(), String> {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .remove(key);
        self.persist().await
    }

    async fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    async fn clear(&self) -> Result<(), String> {
        self.entries.write().expect("storage lock poisoned").clear();
        self.persist().await
    }
}
