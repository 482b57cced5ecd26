//! Folder entity model.

use chrono::{DateTime, Utc};
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::types::{Document, FolderId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::image::model::Image;

/// A named project folder with the images that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Backend-assigned identifier.
    pub id: FolderId,
    /// Display name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Images in fetch order. Not stored on the folder document itself.
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Folder {
    /// Build a folder from its document, with no images attached.
    pub fn from_document(doc: &Document) -> AppResult<Self> {
        let name = doc.get_str("name").ok_or_else(|| {
            AppError::internal(format!("Folder document '{}' has no name", doc.id))
        })?;
        Ok(Self {
            id: FolderId::new(doc.id.clone()),
            name: name.to_string(),
            created_at: doc.created_at,
            images: Vec::new(),
        })
    }

    /// Number of attached images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
}

impl CreateFolder {
    /// Trim the name and reject an empty one.
    pub fn new(name: impl AsRef<str>) -> AppResult<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Document body for the folder collection.
    pub fn into_data(self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("name".to_string(), Value::String(self.name));
        data
    }
}

/// A partial folder update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolder {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateFolder {
    /// Rename only.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Whether the update changes anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    /// Patch body containing only the supplied fields. A supplied name is
    /// trimmed and must not be empty.
    pub fn into_patch(self) -> AppResult<Map<String, Value>> {
        let mut patch = Map::new();
        if let Some(name) = self.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(AppError::validation("Folder name cannot be empty"));
            }
            patch.insert("name".to_string(), Value::String(trimmed.to_string()));
        }
        Ok(patch)
    }
}
