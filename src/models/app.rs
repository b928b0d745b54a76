use serde::{Deserialize, Serialize};

use crate::permissions::RoleItems;

/// A registered application and the permission tree new roles start from.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct App {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub default_role: RoleItems,
    pub version: i64,
    pub enabled: bool,
}
