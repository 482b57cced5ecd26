//! Image entity model.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::types::{Document, FolderId, ImageId, ObjectKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One picture belonging to exactly one folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Backend-assigned identifier.
    pub id: ImageId,
    /// Owning folder.
    pub folder_id: FolderId,
    /// Public URL: a storage view URL or an external link.
    pub url: String,
    /// Storage object key. `None` for images added by URL.
    pub storage_key: Option<ObjectKey>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Image {
    /// Build an image from its document. An empty `storage_path` (the
    /// collection default) is read as "no storage object".
    pub fn from_document(doc: &Document) -> AppResult<Self> {
        let folder_id = doc.get_str("folder_id").ok_or_else(|| {
            AppError::internal(format!("Image document '{}' has no folder_id", doc.id))
        })?;
        let url = doc.get_str("image_url").ok_or_else(|| {
            AppError::internal(format!("Image document '{}' has no image_url", doc.id))
        })?;
        let storage_key = doc
            .get_str("storage_path")
            .filter(|s| !s.is_empty())
            .map(ObjectKey::from);
        Ok(Self {
            id: ImageId::new(doc.id.clone()),
            folder_id: FolderId::from(folder_id),
            url: url.to_string(),
            storage_key,
            created_at: doc.created_at,
        })
    }

    /// Whether the image owns a storage object.
    pub fn is_uploaded(&self) -> bool {
        self.storage_key.is_some()
    }
}

/// Data required to create an image document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateImage {
    /// Owning folder.
    pub folder_id: FolderId,
    /// Public URL.
    pub url: String,
    /// Storage object key, for uploaded files.
    pub storage_key: Option<ObjectKey>,
}

impl CreateImage {
    /// An image backed by an uploaded object.
    pub fn uploaded(folder_id: FolderId, url: String, key: ObjectKey) -> Self {
        Self {
            folder_id,
            url,
            storage_key: Some(key),
        }
    }

    /// An image referencing an external URL.
    pub fn external(folder_id: FolderId, url: impl AsRef<str>) -> AppResult<Self> {
        let url = url.as_ref().trim();
        if url.is_empty() {
            return Err(AppError::validation("Image URL cannot be empty"));
        }
        Ok(Self {
            folder_id,
            url: url.to_string(),
            storage_key: None,
        })
    }

    /// Document body for the image collection.
    pub fn into_data(self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            "folder_id".to_string(),
            Value::String(self.folder_id.into_inner()),
        );
        data.insert("image_url".to_string(), Value::String(self.url));
        data.insert(
            "storage_path".to_string(),
            self.storage_key
                .map(|k| Value::String(k.into_inner()))
                .unwrap_or(Value::Null),
        );
        data
    }
}

/// A file submitted for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name.
    pub file_name: String,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// Contents.
    pub data: Bytes,
}

impl UploadFile {
    /// Create an upload from a name and contents.
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Attach a declared MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image_doc(data: Value) -> Document {
        Document {
            id: "i1".into(),
            collection: "images".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            permissions: Vec::new(),
            data: data.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_empty_storage_path_reads_as_none() {
        let doc = image_doc(json!({"folder_id": "f1", "image_url": "https://x/y.png", "storage_path": ""}));
        let image = Image::from_document(&doc).unwrap();
        assert_eq!(image.storage_key, None);
        assert!(!image.is_uploaded());

        let doc = image_doc(json!({"folder_id": "f1", "image_url": "u", "storage_path": null}));
        assert_eq!(Image::from_document(&doc).unwrap().storage_key, None);
    }

    #[test]
    fn test_uploaded_image_keeps_key() {
        let doc = image_doc(json!({"folder_id": "f1", "image_url": "u", "storage_path": "k1"}));
        let image = Image::from_document(&doc).unwrap();
        assert_eq!(image.storage_key, Some(ObjectKey::new("k1")));
        assert_eq!(image.folder_id, FolderId::new("f1"));
    }

    #[test]
    fn test_external_image_data_has_null_storage_path() {
        let data = CreateImage::external(FolderId::new("f1"), " https://x/y.png ")
            .unwrap()
            .into_data();
        assert_eq!(data.get("image_url"), Some(&json!("https://x/y.png")));
        assert_eq!(data.get("storage_path"), Some(&Value::Null));
        assert!(CreateImage::external(FolderId::new("f1"), "").is_err());
    }
}
