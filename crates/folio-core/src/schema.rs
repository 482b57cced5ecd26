//! Collection and bucket schemas.
//!
//! These describe the two gallery collections and the image bucket. The
//! provisioning routine creates them on the hosted backend; self-hosted
//! providers use the same definitions to validate writes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::{Permission, Role};

/// Collection- and bucket-level grants: anyone may read, create, update,
/// and delete. Admin gating happens in the application, not the backend.
fn open_permissions() -> Vec<Permission> {
    vec![
        Permission::read(Role::Any),
        Permission::create(Role::Any),
        Permission::update(Role::Any),
        Permission::delete(Role::Any),
    ]
}

/// Attribute type and bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttributeKind {
    /// UTF-8 string of at most `size` characters.
    String {
        /// Maximum length in characters.
        size: usize,
    },
    /// Signed integer in `min..=max`.
    Integer {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

/// A single attribute definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Attribute key.
    pub key: String,
    /// Type and bounds.
    pub kind: AttributeKind,
    /// Whether every document must carry a non-null value.
    pub required: bool,
    /// Value stored when an optional attribute is omitted.
    pub default: Option<Value>,
}

impl AttributeSpec {
    fn string(key: &str, size: usize, required: bool, default: Option<Value>) -> Self {
        Self {
            key: key.to_string(),
            kind: AttributeKind::String { size },
            required,
            default,
        }
    }

    fn integer(key: &str, min: i64, max: i64) -> Self {
        Self {
            key: key.to_string(),
            kind: AttributeKind::Integer { min, max },
            required: false,
            default: None,
        }
    }

    fn check(&self, value: &Value) -> AppResult<()> {
        if value.is_null() {
            return if self.required {
                Err(AppError::validation(format!(
                    "Attribute '{}' is required",
                    self.key
                )))
            } else {
                Ok(())
            };
        }
        match self.kind {
            AttributeKind::String { size } => {
                let s = value.as_str().ok_or_else(|| {
                    AppError::validation(format!("Attribute '{}' must be a string", self.key))
                })?;
                if s.chars().count() > size {
                    return Err(AppError::validation(format!(
                        "Attribute '{}' exceeds {size} characters",
                        self.key
                    )));
                }
            }
            AttributeKind::Integer { min, max } => {
                let n = value.as_i64().ok_or_else(|| {
                    AppError::validation(format!("Attribute '{}' must be an integer", self.key))
                })?;
                if n < min || n > max {
                    return Err(AppError::validation(format!(
                        "Attribute '{}' must be between {min} and {max}",
                        self.key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A collection definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    /// Collection identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Collection-level grants.
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Attribute definitions.
    pub attributes: Vec<AttributeSpec>,
}

impl CollectionSchema {
    /// The folder collection: a required name of up to 500 characters.
    pub fn folders(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Folders".to_string(),
            permissions: open_permissions(),
            attributes: vec![AttributeSpec::string("name", 500, true, None)],
        }
    }

    /// The image collection: owning folder, public URL, optional storage
    /// key (empty by default), and an optional position.
    pub fn images(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Images".to_string(),
            permissions: open_permissions(),
            attributes: vec![
                AttributeSpec::string("folder_id", 100, true, None),
                AttributeSpec::string("image_url", 5000, true, None),
                AttributeSpec::string("storage_path", 500, false, Some(Value::String(String::new()))),
                AttributeSpec::integer("position", 0, 10_000),
            ],
        }
    }

    /// Find an attribute definition.
    pub fn attribute(&self, key: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// Validate a full document body.
    pub fn validate(&self, data: &Map<String, Value>) -> AppResult<()> {
        self.validate_patch(data)?;
        for attr in self.attributes.iter().filter(|a| a.required) {
            match data.get(&attr.key) {
                Some(v) if !v.is_null() => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Missing required attribute '{}'",
                        attr.key
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validate a partial update: only the supplied attributes are checked.
    pub fn validate_patch(&self, data: &Map<String, Value>) -> AppResult<()> {
        for (key, value) in data {
            let attr = self.attribute(key).ok_or_else(|| {
                AppError::validation(format!(
                    "Unknown attribute '{key}' for collection '{}'",
                    self.id
                ))
            })?;
            attr.check(value)?;
        }
        Ok(())
    }

    /// Fill omitted optional attributes with their defaults, or null.
    pub fn apply_defaults(&self, data: &mut Map<String, Value>) {
        for attr in &self.attributes {
            data.entry(attr.key.clone())
                .or_insert_with(|| attr.default.clone().unwrap_or(Value::Null));
        }
    }
}

/// Upload policy for the image bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketPolicy {
    /// Bucket identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Bucket-level grants.
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Maximum object size in bytes.
    pub max_file_size: u64,
    /// Accepted MIME types.
    pub allowed_mime_types: Vec<String>,
}

/// 10 MiB.
pub const MAX_IMAGE_BYTES: u64 = 10_485_760;

impl BucketPolicy {
    /// The project image bucket.
    pub fn project_images(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Project Images".to_string(),
            permissions: open_permissions(),
            max_file_size: MAX_IMAGE_BYTES,
            allowed_mime_types: [
                "image/jpeg",
                "image/png",
                "image/gif",
                "image/webp",
                "image/svg+xml",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
        }
    }

    /// Check an upload against the policy.
    pub fn check(&self, mime_type: &str, size_bytes: u64) -> AppResult<()> {
        if size_bytes > self.max_file_size {
            return Err(AppError::validation(format!(
                "File size {size_bytes} exceeds the {} byte limit",
                self.max_file_size
            )));
        }
        if !self.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(AppError::validation(format!(
                "File type '{mime_type}' is not allowed"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_folder_name_required_and_bounded() {
        let schema = CollectionSchema::folders("folders");
        assert!(schema.validate(&body(json!({"name": "Alpha"}))).is_ok());
        assert!(schema.validate(&body(json!({}))).is_err());
        let long = "x".repeat(501);
        assert!(schema.validate(&body(json!({"name": long}))).is_err());
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let schema = CollectionSchema::folders("folders");
        let err = schema
            .validate(&body(json!({"name": "A", "colour": "red"})))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_image_optional_fields() {
        let schema = CollectionSchema::images("images");
        let ok = body(json!({"folder_id": "f1", "image_url": "https://x/y.png", "storage_path": null}));
        assert!(schema.validate(&ok).is_ok());
        let bad_position = body(json!({"folder_id": "f1", "image_url": "u", "position": 10_001}));
        assert!(schema.validate(&bad_position).is_err());
    }

    #[test]
    fn test_patch_skips_required_check() {
        let schema = CollectionSchema::images("images");
        assert!(schema.validate_patch(&body(json!({"image_url": "u"}))).is_ok());
        assert!(schema.validate(&body(json!({"image_url": "u"}))).is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let schema = CollectionSchema::images("images");
        let mut data = body(json!({"folder_id": "f1", "image_url": "u"}));
        schema.apply_defaults(&mut data);
        assert_eq!(data.get("storage_path"), Some(&json!("")));
        assert_eq!(data.get("position"), Some(&Value::Null));
    }

    #[test]
    fn test_bucket_policy() {
        let policy = BucketPolicy::project_images("project-images");
        assert!(policy.check("image/png", 1024).is_ok());
        assert!(policy.check("image/png", MAX_IMAGE_BYTES + 1).is_err());
        assert!(policy.check("application/pdf", 10).is_err());
    }
}
