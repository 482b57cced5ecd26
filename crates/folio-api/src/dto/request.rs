//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Admin password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Folder listing query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFoldersQuery {
    /// `asc`/`oldest` or `desc`/`newest`; defaults to ascending.
    pub order: Option<String>,
    /// Case-insensitive name filter.
    pub q: Option<String>,
}

/// Create folder body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 500, message = "Name must be 1-500 characters"))]
    pub name: String,
}

/// Update folder body. Omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// New folder name.
    #[validate(length(min = 1, max = 500, message = "Name must be 1-500 characters"))]
    pub name: Option<String>,
}

/// Add-by-URL body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddImageUrlRequest {
    /// External image URL.
    #[validate(url(message = "A valid URL is required"), length(max = 5000))]
    pub url: String,
    /// Requested position. Accepted but not stored.
    #[serde(default)]
    #[validate(range(max = 10_000))]
    pub position: u32,
}

/// Chat question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssistantRequest {
    /// The question.
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
    /// Reply language code.
    pub language: Option<String>,
}
