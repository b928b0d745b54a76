use serde::{Deserialize, Serialize};

use crate::permissions::RoleItems;

/// A role: a named permission tree scoped to one application.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Id of the application this role belongs to.
    pub app: String,
    pub name: String,
    #[serde(default)]
    pub items: RoleItems,
    pub enabled: bool,
}

/// Just enough of a role to populate pickers.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RoleName {
    pub id: String,
    pub name: String,
}
