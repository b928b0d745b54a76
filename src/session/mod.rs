pub mod storage;
pub mod store;

// Re-export the primary session items so code outside can do
// "use crate::session::{SessionStore, StorageBackend};"
pub use storage::{create_storage, FileStorage, MemoryStorage, StorageBackend};
pub use store::{Login, SessionStore};
