//! Local filesystem object storage provider.
//!
//! Layout under the configured root:
//!
//! ```text
//! {root}/{bucket}/bucket.json         bucket policy
//! {root}/{bucket}/objects/{key}       object bytes
//! {root}/{bucket}/meta/{key}.json     object metadata
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::fs;
use tracing::{debug, info};

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::schema::BucketPolicy;
use folio_core::traits::{ObjectContent, ObjectStorage, ObjectUpload, StoredObject};
use folio_core::types::ObjectKey;
use folio_core::types::id::validate_id;

use crate::api_view_url;
use crate::mime::resolve_mime;

/// Filesystem-backed bucket.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    /// Bucket directory.
    bucket_dir: PathBuf,
    /// Base URL objects are served under.
    public_url: String,
}

impl LocalObjectStorage {
    /// Create a provider for `bucket_id` under `root_path`, creating the
    /// root directory if needed.
    pub async fn new(root_path: &str, bucket_id: &str, public_url: &str) -> AppResult<Self> {
        validate_id(bucket_id)?;
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            bucket_dir: root.join(bucket_id),
            public_url: public_url.to_string(),
        })
    }

    fn policy_path(&self) -> PathBuf {
        self.bucket_dir.join("bucket.json")
    }

    fn object_path(&self, key: &ObjectKey) -> AppResult<PathBuf> {
        validate_id(key.as_str())?;
        Ok(self.bucket_dir.join("objects").join(key.as_str()))
    }

    fn meta_path(&self, key: &ObjectKey) -> AppResult<PathBuf> {
        validate_id(key.as_str())?;
        Ok(self
            .bucket_dir
            .join("meta")
            .join(format!("{}.json", key.as_str())))
    }

    async fn load_policy(&self) -> AppResult<BucketPolicy> {
        let raw = fs::read(self.policy_path()).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!(
                    "Bucket not found: {}",
                    self.bucket_dir.display()
                ))
            } else {
                AppError::with_source(ErrorKind::Storage, "Failed to read bucket policy", e)
            }
        })?;
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn load_meta(&self, key: &ObjectKey) -> AppResult<StoredObject> {
        let raw = fs::read(self.meta_path(key)?).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read object metadata: {key}"),
                    e,
                )
            }
        })?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.policy_path().is_file())
    }

    async fn create_bucket(&self, policy: &BucketPolicy) -> AppResult<()> {
        if self.policy_path().exists() {
            return Err(AppError::conflict(format!(
                "Bucket '{}' already exists",
                policy.id
            )));
        }
        for dir in ["objects", "meta"] {
            fs::create_dir_all(self.bucket_dir.join(dir)).await?;
        }
        fs::write(self.policy_path(), serde_json::to_vec_pretty(policy)?).await?;
        info!(bucket = %policy.id, "Created local bucket");
        Ok(())
    }

    async fn put_object(&self, upload: ObjectUpload) -> AppResult<StoredObject> {
        let policy = self.load_policy().await?;
        let mime_type = resolve_mime(upload.content_type.as_deref(), &upload.file_name);
        let size_bytes = upload.data.len() as u64;
        policy.check(&mime_type, size_bytes)?;

        let key = ObjectKey::generate();
        let object = StoredObject {
            key: key.clone(),
            name: upload.file_name,
            mime_type,
            size_bytes,
            created_at: Utc::now(),
        };

        fs::write(self.object_path(&key)?, &upload.data)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to write object: {key}"),
                    e,
                )
            })?;
        fs::write(self.meta_path(&key)?, serde_json::to_vec(&object)?).await?;

        debug!(key = %key, bytes = size_bytes, "Stored object");
        Ok(object)
    }

    async fn read_object(&self, key: &ObjectKey) -> AppResult<ObjectContent> {
        let meta = self.load_meta(key).await?;
        let data = fs::read(self.object_path(key)?).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read object: {key}"),
                    e,
                )
            }
        })?;
        Ok(ObjectContent {
            mime_type: meta.mime_type,
            data: Bytes::from(data),
        })
    }

    async fn delete_object(&self, key: &ObjectKey) -> AppResult<()> {
        let path = self.object_path(key)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete object: {key}"),
                    e,
                )
            }
        })?;
        if let Err(e) = fs::remove_file(self.meta_path(key)?).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete object metadata: {key}"),
                    e,
                ));
            }
        }
        debug!(key = %key, "Deleted object");
        Ok(())
    }

    fn view_url(&self, key: &ObjectKey) -> String {
        api_view_url(&self.public_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provisioned(dir: &tempfile::TempDir) -> LocalObjectStorage {
        let storage = LocalObjectStorage::new(
            dir.path().to_str().unwrap(),
            "project-images",
            "http://localhost:8080/",
        )
        .await
        .unwrap();
        storage
            .create_bucket(&BucketPolicy::project_images("project-images"))
            .await
            .unwrap();
        storage
    }

    fn png(name: &str, bytes: &'static [u8]) -> ObjectUpload {
        ObjectUpload {
            file_name: name.to_string(),
            content_type: None,
            data: Bytes::from_static(bytes),
            permissions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_put_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = provisioned(&dir).await;

        let stored = storage.put_object(png("shot.png", b"pixels")).await.unwrap();
        assert_eq!(stored.mime_type, "image/png");
        assert_eq!(stored.size_bytes, 6);

        let content = storage.read_object(&stored.key).await.unwrap();
        assert_eq!(content.data, Bytes::from_static(b"pixels"));
        assert_eq!(content.mime_type, "image/png");

        storage.delete_object(&stored.key).await.unwrap();
        assert!(storage.read_object(&stored.key).await.unwrap_err().is_not_found());
        assert!(storage.delete_object(&stored.key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_policy_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let storage = provisioned(&dir).await;
        let err = storage
            .put_object(png("notes.pdf", b"%PDF"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_bucket_and_duplicate_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path().to_str().unwrap(), "b1", "http://x")
            .await
            .unwrap();
        assert!(!storage.health_check().await.unwrap());
        let err = storage.put_object(png("a.png", b"a")).await.unwrap_err();
        assert!(err.is_not_found());

        let policy = BucketPolicy::project_images("b1");
        storage.create_bucket(&policy).await.unwrap();
        assert!(storage.create_bucket(&policy).await.unwrap_err().is_conflict());
        assert!(storage.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = provisioned(&dir).await;
        let err = storage
            .read_object(&ObjectKey::new("../bucket.json"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_view_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = provisioned(&dir).await;
        assert_eq!(
            storage.view_url(&ObjectKey::new("k1")),
            "http://localhost:8080/api/files/k1"
        );
    }
}
