// This module re-exports the permission tree types for convenience,
// so we can "use crate::permissions::*" easily.
pub mod roles;

pub use roles::{DataOptions, DataValue, Item, RoleItems, Value};
