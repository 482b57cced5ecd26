//! Object storage trait for pluggable blob backends.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::schema::BucketPolicy;
use crate::types::{ObjectKey, Permission};

/// A file handed to [`ObjectStorage::put_object`].
#[derive(Debug, Clone)]
pub struct ObjectUpload {
    /// Original file name.
    pub file_name: String,
    /// Declared MIME type, if known. Providers fall back to the extension.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
    /// Access grants on the stored object.
    pub permissions: Vec<Permission>,
}

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Backend-assigned key.
    pub key: ObjectKey,
    /// Original file name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

/// Object contents with their MIME type.
#[derive(Debug, Clone)]
pub struct ObjectContent {
    /// MIME type.
    pub mime_type: String,
    /// Raw bytes.
    pub data: Bytes,
}

/// A blob store scoped to a single bucket.
///
/// Implementations exist for the hosted backend service, the local
/// filesystem, and memory.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "appwrite", "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Create the bucket this storage is scoped to.
    async fn create_bucket(&self, policy: &BucketPolicy) -> AppResult<()>;

    /// Store a file under a fresh backend-assigned key.
    async fn put_object(&self, upload: ObjectUpload) -> AppResult<StoredObject>;

    /// Read a stored object.
    async fn read_object(&self, key: &ObjectKey) -> AppResult<ObjectContent>;

    /// Delete a stored object.
    async fn delete_object(&self, key: &ObjectKey) -> AppResult<()>;

    /// Public URL under which the object can be viewed.
    fn view_url(&self, key: &ObjectKey) -> String;
}
