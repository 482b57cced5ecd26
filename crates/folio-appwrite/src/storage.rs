//! Object storage over the Appwrite storage API.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::schema::BucketPolicy;
use folio_core::traits::{ObjectContent, ObjectStorage, ObjectUpload, StoredObject};
use folio_core::types::ObjectKey;

use crate::client::AppwriteClient;

/// Uploads above this size must be sent in `Content-Range` chunks.
pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct FileResponse {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$createdAt")]
    created_at: DateTime<Utc>,
    name: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(rename = "sizeOriginal")]
    size_original: u64,
}

impl From<FileResponse> for StoredObject {
    fn from(file: FileResponse) -> Self {
        Self {
            key: ObjectKey::new(file.id),
            name: file.name,
            mime_type: file.mime_type,
            size_bytes: file.size_original,
            created_at: file.created_at,
        }
    }
}

/// [`ObjectStorage`] backed by one Appwrite bucket.
#[derive(Debug, Clone)]
pub struct AppwriteObjectStorage {
    client: Arc<AppwriteClient>,
    bucket_id: String,
}

impl AppwriteObjectStorage {
    /// Create a storage for `bucket_id`.
    pub fn new(client: Arc<AppwriteClient>, bucket_id: impl Into<String>) -> Self {
        Self {
            client,
            bucket_id: bucket_id.into(),
        }
    }

    fn files_path(&self) -> String {
        format!("/storage/buckets/{}/files", self.bucket_id)
    }

    fn chunk_form(
        key: &ObjectKey,
        upload: &ObjectUpload,
        chunk: Bytes,
        mime_type: &str,
    ) -> AppResult<Form> {
        let part = Part::bytes(chunk.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(mime_type)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Validation,
                    format!("Invalid content type '{mime_type}'"),
                    e,
                )
            })?;
        let mut form = Form::new()
            .text("fileId", key.to_string())
            .part("file", part);
        for permission in &upload.permissions {
            form = form.text("permissions[]", permission.to_string());
        }
        Ok(form)
    }
}

/// File extensions accepted for each allowed MIME type.
fn extensions_for(mime_types: &[String]) -> Vec<&'static str> {
    mime_types
        .iter()
        .flat_map(|mime| match mime.as_str() {
            "image/jpeg" => &["jpg", "jpeg"][..],
            "image/png" => &["png"][..],
            "image/gif" => &["gif"][..],
            "image/webp" => &["webp"][..],
            "image/svg+xml" => &["svg"][..],
            _ => &[][..],
        })
        .copied()
        .collect()
}

#[async_trait]
impl ObjectStorage for AppwriteObjectStorage {
    fn provider_type(&self) -> &str {
        "appwrite"
    }

    async fn health_check(&self) -> AppResult<bool> {
        let url = self
            .client
            .url(&format!("/storage/buckets/{}", self.bucket_id))?;
        self.client
            .send_empty(self.client.request(Method::GET, url))
            .await?;
        Ok(true)
    }

    async fn create_bucket(&self, policy: &BucketPolicy) -> AppResult<()> {
        let url = self.client.url("/storage/buckets")?;
        let permissions: Vec<String> = policy.permissions.iter().map(|p| p.to_string()).collect();
        let body = json!({
            "bucketId": self.bucket_id,
            "name": policy.name,
            "permissions": permissions,
            "fileSecurity": false,
            "enabled": true,
            "maximumFileSize": policy.max_file_size,
            "allowedFileExtensions": extensions_for(&policy.allowed_mime_types),
        });
        self.client
            .send_empty(self.client.request(Method::POST, url).json(&body))
            .await?;
        info!(bucket = %self.bucket_id, "Created bucket");
        Ok(())
    }

    async fn put_object(&self, upload: ObjectUpload) -> AppResult<StoredObject> {
        let key = ObjectKey::generate();
        let mime_type = upload
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let total = upload.data.len();
        let url = self.client.url(&self.files_path())?;

        if total <= CHUNK_SIZE {
            let form = Self::chunk_form(&key, &upload, upload.data.clone(), &mime_type)?;
            let file: FileResponse = self
                .client
                .send_json(self.client.request(Method::POST, url).multipart(form))
                .await?;
            debug!(key = %file.id, bytes = total, "Uploaded object");
            return Ok(file.into());
        }

        let mut offset = 0;
        let mut last = None;
        while offset < total {
            let end = (offset + CHUNK_SIZE).min(total);
            let chunk = upload.data.slice(offset..end);
            let form = Self::chunk_form(&key, &upload, chunk, &mime_type)?;
            let mut request = self
                .client
                .request(Method::POST, url.clone())
                .header("Content-Range", format!("bytes {offset}-{}/{total}", end - 1))
                .multipart(form);
            if offset > 0 {
                request = request.header("X-Appwrite-ID", key.as_str());
            }
            let file: FileResponse = self.client.send_json(request).await?;
            last = Some(file);
            offset = end;
        }

        debug!(key = %key, bytes = total, "Uploaded object in chunks");
        last.map(StoredObject::from)
            .ok_or_else(|| AppError::internal("Chunked upload produced no response"))
    }

    async fn read_object(&self, key: &ObjectKey) -> AppResult<ObjectContent> {
        let url = self
            .client
            .url(&format!("{}/{key}/view", self.files_path()))?;
        let response = self
            .client
            .send(self.client.request(Method::GET, url))
            .await?;
        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = response.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::Transport, "Failed to read object body", e)
        })?;
        Ok(ObjectContent { mime_type, data })
    }

    async fn delete_object(&self, key: &ObjectKey) -> AppResult<()> {
        let url = self.client.url(&format!("{}/{key}", self.files_path()))?;
        self.client
            .send_empty(self.client.request(Method::DELETE, url))
            .await
    }

    fn view_url(&self, key: &ObjectKey) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/view?project={}",
            self.client.endpoint(),
            self.bucket_id,
            key,
            self.client.project_id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::config::backend::BackendConfig;

    fn storage() -> AppwriteObjectStorage {
        let config = BackendConfig {
            project_id: "folio".into(),
            endpoint: "https://cloud.appwrite.io/v1".into(),
            ..BackendConfig::default()
        };
        let client = Arc::new(AppwriteClient::new(&config).unwrap());
        AppwriteObjectStorage::new(client, "project-images")
    }

    #[test]
    fn test_view_url() {
        assert_eq!(
            storage().view_url(&ObjectKey::new("abc")),
            "https://cloud.appwrite.io/v1/storage/buckets/project-images/files/abc/view?project=folio"
        );
    }

    #[test]
    fn test_extensions_for_policy() {
        let policy = BucketPolicy::project_images("project-images");
        assert_eq!(
            extensions_for(&policy.allowed_mime_types),
            vec!["jpg", "jpeg", "png", "gif", "webp", "svg"]
        );
    }

    #[test]
    fn test_file_response_maps_to_stored_object() {
        let raw = r#"{"$id":"k1","$createdAt":"2026-03-01T10:00:00.000+00:00","name":"a.png","mimeType":"image/png","sizeOriginal":42,"bucketId":"b"}"#;
        let file: FileResponse = serde_json::from_str(raw).unwrap();
        let object = StoredObject::from(file);
        assert_eq!(object.key, ObjectKey::new("k1"));
        assert_eq!(object.size_bytes, 42);
    }
}
