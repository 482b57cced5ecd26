//! In-memory object storage provider.
//!
//! Used by tests and throwaway local runs. Supports one-shot failure
//! injection per operation and records every call.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::schema::BucketPolicy;
use folio_core::traits::{ObjectContent, ObjectStorage, ObjectUpload, StoredObject};
use folio_core::types::ObjectKey;

use crate::api_view_url;
use crate::mime::resolve_mime;

/// Storage operations that can be recorded or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOp {
    /// `put_object`, targeted by file name.
    Put,
    /// `read_object`, targeted by key.
    Read,
    /// `delete_object`, targeted by key.
    Delete,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Put => "put",
            Self::Read => "read",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// In-memory [`ObjectStorage`].
#[derive(Debug, Clone)]
pub struct MemoryObjectStorage {
    public_url: String,
    policy: Arc<Mutex<Option<BucketPolicy>>>,
    objects: Arc<DashMap<ObjectKey, (StoredObject, Bytes)>>,
    failures: Arc<DashMap<(StorageOp, String), ErrorKind>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MemoryObjectStorage {
    /// Create a storage with no bucket yet.
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
            policy: Arc::new(Mutex::new(None)),
            objects: Arc::new(DashMap::new()),
            failures: Arc::new(DashMap::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a storage whose bucket already exists.
    pub fn with_policy(public_url: impl Into<String>, policy: BucketPolicy) -> Self {
        let mut storage = Self::new(public_url);
        storage.policy = Arc::new(Mutex::new(Some(policy)));
        storage
    }

    /// Make the next `op` on `target` fail with `kind`.
    pub fn fail_next(&self, op: StorageOp, target: impl Into<String>, kind: ErrorKind) {
        self.failures.insert((op, target.into()), kind);
    }

    /// Recorded calls, formatted as `"{op} {target}"`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Whether an object is stored under `key`.
    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the bucket holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    async fn record(&self, op: StorageOp, target: &str) -> AppResult<()> {
        self.calls.lock().await.push(format!("{op} {target}"));
        match self.failures.remove(&(op, target.to_string())) {
            Some((_, kind)) => Err(AppError::new(
                kind,
                format!("Simulated {op} failure for '{target}'"),
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.policy.lock().await.is_some())
    }

    async fn create_bucket(&self, policy: &BucketPolicy) -> AppResult<()> {
        let mut current = self.policy.lock().await;
        if current.is_some() {
            return Err(AppError::conflict(format!(
                "Bucket '{}' already exists",
                policy.id
            )));
        }
        *current = Some(policy.clone());
        Ok(())
    }

    async fn put_object(&self, upload: ObjectUpload) -> AppResult<StoredObject> {
        self.record(StorageOp::Put, &upload.file_name).await?;
        let policy = self
            .policy
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::not_found("Bucket not found"))?;

        let mime_type = resolve_mime(upload.content_type.as_deref(), &upload.file_name);
        let size_bytes = upload.data.len() as u64;
        policy.check(&mime_type, size_bytes)?;

        let object = StoredObject {
            key: ObjectKey::generate(),
            name: upload.file_name,
            mime_type,
            size_bytes,
            created_at: Utc::now(),
        };
        self.objects
            .insert(object.key.clone(), (object.clone(), upload.data));
        Ok(object)
    }

    async fn read_object(&self, key: &ObjectKey) -> AppResult<ObjectContent> {
        self.record(StorageOp::Read, key.as_str()).await?;
        self.objects
            .get(key)
            .map(|entry| ObjectContent {
                mime_type: entry.0.mime_type.clone(),
                data: entry.1.clone(),
            })
            .ok_or_else(|| AppError::not_found(format!("Object not found: {key}")))
    }

    async fn delete_object(&self, key: &ObjectKey) -> AppResult<()> {
        self.record(StorageOp::Delete, key.as_str()).await?;
        self.objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {key}")))
    }

    fn view_url(&self, key: &ObjectKey) -> String {
        api_view_url(&self.public_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> ObjectUpload {
        ObjectUpload {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            data: Bytes::from_static(b"png"),
            permissions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_put_assigns_fresh_keys() {
        let storage =
            MemoryObjectStorage::with_policy("http://x", BucketPolicy::project_images("b"));
        let a = storage.put_object(upload("a.png")).await.unwrap();
        let b = storage.put_object(upload("a.png")).await.unwrap();
        assert_ne!(a.key, b.key);
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.view_url(&a.key), format!("http://x/api/files/{}", a.key));
    }

    #[tokio::test]
    async fn test_missing_bucket() {
        let storage = MemoryObjectStorage::new("http://x");
        assert!(!storage.health_check().await.unwrap());
        assert!(storage.put_object(upload("a.png")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_injected_put_failure() {
        let storage =
            MemoryObjectStorage::with_policy("http://x", BucketPolicy::project_images("b"));
        storage.fail_next(StorageOp::Put, "bad.png", ErrorKind::Transport);
        let err = storage.put_object(upload("bad.png")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
        assert!(storage.is_empty());
        assert_eq!(storage.calls().await, vec!["put bad.png"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let storage =
            MemoryObjectStorage::with_policy("http://x", BucketPolicy::project_images("b"));
        let err = storage
            .delete_object(&ObjectKey::new("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
