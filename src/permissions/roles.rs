use serde::{Deserialize, Serialize};

/// A typed leaf value in a permission tree.
///
/// Serializes externally tagged with lowercase keys, so a boolean leaf reads
/// `{"name": "v", "boolean": true}` on the wire when flattened into a `Value`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DataValue {
    String(String),
    Number(i64),
    Float(f64),
    Boolean(bool),
}

impl DataValue {
    /// The zero value for this leaf's type: empty string, 0, 0.0, or false.
    pub fn zero(&self) -> DataValue {
        match self {
            DataValue::String(_) => DataValue::String(String::new()),
            DataValue::Number(_) => DataValue::Number(0),
            DataValue::Float(_) => DataValue::Float(0.0),
            DataValue::Boolean(_) => DataValue::Boolean(false),
        }
    }
}

/// Optional numeric bounds attached to a value by the role editor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataOptions {
    pub min_value: DataValue,
    pub max_value: DataValue,
}

/// A named leaf holding its typed data and optional bounds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Value {
    pub name: String,
    #[serde(flatten)]
    pub data: DataValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<DataOptions>,
}

impl Value {
    /// Resets the leaf to its type's zero value. Bounds are left untouched.
    pub fn clear(&mut self) {
        self.data = self.data.zero();
    }
}

/// A named node in the permission tree: leaf values plus nested items.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Item {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
}

impl Item {
    /// Depth-first reset of every leaf under this item.
    pub fn clear(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
        for item in &mut self.items {
            item.clear();
        }
    }
}

/// The permission grants attached to a role (or to a whole session).
///
/// Just a recursive data shape; the only traversal it owns is `clear`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct RoleItems {
    #[serde(default)]
    pub items: Vec<Item>,
}

impl RoleItems {
    pub fn new(items: Vec<Item>) -> Self {
        RoleItems { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resets every leaf in the tree to zero/false/empty, recursively.
    pub fn clear(&mut self) {
        for item in &mut self.items {
            item.clear();
        }
    }

    /// Serializes the tree to the string form used by the session storage.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Error serializing permissions: {}", e))
    }

    /// Parses the string form back into a tree.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Error parsing permissions: {}", e))
    }
}
