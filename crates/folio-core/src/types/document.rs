//! Schemaless documents as returned by a document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::permission::Permission;

/// Name of the system creation timestamp attribute, used for ordering.
pub const CREATED_AT: &str = "$createdAt";

/// A stored document: system metadata plus user attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Backend-assigned identifier.
    pub id: String,
    /// Owning collection identifier.
    pub collection: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Access grants.
    pub permissions: Vec<Permission>,
    /// User attributes.
    pub data: Map<String, Value>,
}

impl Document {
    /// Read a string attribute. Missing or non-string values yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Read an integer attribute.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(Value::as_i64)
    }
}

impl Document {
    /// Look up an attribute by name, including the `$id`, `$createdAt`, and
    /// `$updatedAt` system attributes.
    pub fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "$id" => Some(Value::String(self.id.clone())),
            CREATED_AT => Some(Value::String(self.created_at.to_rfc3339())),
            "$updatedAt" => Some(Value::String(self.updated_at.to_rfc3339())),
            _ => self.data.get(key).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        let mut data = Map::new();
        data.insert("name".into(), json!("Alpha"));
        data.insert("position".into(), json!(3));
        Document {
            id: "d1".into(),
            collection: "folders".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            permissions: Vec::new(),
            data,
        }
    }

    #[test]
    fn test_typed_getters() {
        let doc = sample();
        assert_eq!(doc.get_str("name"), Some("Alpha"));
        assert_eq!(doc.get_str("position"), None);
        assert_eq!(doc.get_i64("position"), Some(3));
    }

    #[test]
    fn test_system_attributes() {
        let doc = sample();
        assert_eq!(doc.attribute("$id"), Some(json!("d1")));
        assert!(doc.attribute(CREATED_AT).is_some());
        assert_eq!(doc.attribute("missing"), None);
    }
}
