//! Document store over the Appwrite databases API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::schema::{AttributeKind, AttributeSpec, CollectionSchema};
use folio_core::traits::DocumentStore;
use folio_core::types::{Document, DocumentQuery, Permission};

use crate::client::AppwriteClient;
use crate::query;

/// Attempts made while waiting for new attributes to become available.
const ATTRIBUTE_POLL_ATTEMPTS: u32 = 20;
/// Delay between availability checks.
const ATTRIBUTE_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct AttributeStatus {
    status: String,
    #[serde(default)]
    error: String,
}

/// [`DocumentStore`] backed by one Appwrite database.
#[derive(Debug, Clone)]
pub struct AppwriteDocumentStore {
    client: Arc<AppwriteClient>,
    database_id: String,
}

impl AppwriteDocumentStore {
    /// Create a store for `database_id`.
    pub fn new(client: Arc<AppwriteClient>, database_id: impl Into<String>) -> Self {
        Self {
            client,
            database_id: database_id.into(),
        }
    }

    fn collection_path(&self, collection: &str) -> String {
        format!("/databases/{}/collections/{collection}", self.database_id)
    }

    fn documents_path(&self, collection: &str) -> String {
        format!("{}/documents", self.collection_path(collection))
    }

    async fn create_attribute(&self, collection: &str, attr: &AttributeSpec) -> AppResult<()> {
        let (kind, body) = match attr.kind {
            AttributeKind::String { size } => (
                "string",
                json!({
                    "key": attr.key,
                    "size": size,
                    "required": attr.required,
                    "default": attr.default,
                }),
            ),
            AttributeKind::Integer { min, max } => (
                "integer",
                json!({
                    "key": attr.key,
                    "required": attr.required,
                    "min": min,
                    "max": max,
                    "default": attr.default,
                }),
            ),
        };
        let url = self.client.url(&format!(
            "{}/attributes/{kind}",
            self.collection_path(collection)
        ))?;
        self.client
            .send_empty(self.client.request(Method::POST, url).json(&body))
            .await
    }

    /// Attribute creation is asynchronous on the server; writes that use an
    /// attribute fail until it reports `available`.
    async fn wait_for_attribute(&self, collection: &str, key: &str) -> AppResult<()> {
        let url = self.client.url(&format!(
            "{}/attributes/{key}",
            self.collection_path(collection)
        ))?;
        for _ in 0..ATTRIBUTE_POLL_ATTEMPTS {
            let status: AttributeStatus = self
                .client
                .send_json(self.client.request(Method::GET, url.clone()))
                .await?;
            match status.status.as_str() {
                "available" => return Ok(()),
                "failed" | "stuck" => {
                    return Err(AppError::new(
                        ErrorKind::Transport,
                        format!("Attribute '{collection}.{key}' failed: {}", status.error),
                    ));
                }
                _ => tokio::time::sleep(ATTRIBUTE_POLL_INTERVAL).await,
            }
        }
        warn!(collection, key, "Attribute still processing after polling");
        Ok(())
    }
}

/// Split an API document into system metadata and user attributes.
pub(crate) fn parse_document(mut raw: Map<String, Value>) -> AppResult<Document> {
    let take_str = |raw: &mut Map<String, Value>, key: &str| -> AppResult<String> {
        match raw.remove(key) {
            Some(Value::String(s)) => Ok(s),
            _ => Err(AppError::new(
                ErrorKind::Transport,
                format!("Backend document is missing '{key}'"),
            )),
        }
    };
    let parse_time = |raw: &str| -> AppResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| AppError::with_source(ErrorKind::Transport, "Invalid timestamp", e))
    };

    let id = take_str(&mut raw, "$id")?;
    let collection = take_str(&mut raw, "$collectionId")?;
    let created_at = parse_time(&take_str(&mut raw, "$createdAt")?)?;
    let updated_at = parse_time(&take_str(&mut raw, "$updatedAt")?)?;
    let permissions = match raw.remove("$permissions") {
        Some(value) => serde_json::from_value::<Vec<Permission>>(value)?,
        None => Vec::new(),
    };
    raw.retain(|key, _| !key.starts_with('$'));

    Ok(Document {
        id,
        collection,
        created_at,
        updated_at,
        permissions,
        data: raw,
    })
}

#[async_trait]
impl DocumentStore for AppwriteDocumentStore {
    fn backend_type(&self) -> &str {
        "appwrite"
    }

    async fn health_check(&self) -> AppResult<bool> {
        let url = self.client.url(&format!("/databases/{}", self.database_id))?;
        self.client
            .send_empty(self.client.request(Method::GET, url))
            .await?;
        Ok(true)
    }

    async fn create_database(&self, name: &str) -> AppResult<()> {
        let url = self.client.url("/databases")?;
        let body = json!({"databaseId": self.database_id, "name": name});
        self.client
            .send_empty(self.client.request(Method::POST, url).json(&body))
            .await?;
        info!(database_id = %self.database_id, "Created database");
        Ok(())
    }

    /// Creates the collection, then every attribute. An existing collection
    /// still gets its missing attributes before `Conflict` is reported, so
    /// re-running provisioning repairs a partial setup.
    async fn create_collection(&self, schema: &CollectionSchema) -> AppResult<()> {
        let url = self
            .client
            .url(&format!("/databases/{}/collections", self.database_id))?;
        let permissions: Vec<String> = schema.permissions.iter().map(|p| p.to_string()).collect();
        let body = json!({
            "collectionId": schema.id,
            "name": schema.name,
            "permissions": permissions,
            "documentSecurity": false,
        });

        let existed = match self
            .client
            .send_empty(self.client.request(Method::POST, url).json(&body))
            .await
        {
            Ok(()) => false,
            Err(e) if e.is_conflict() => true,
            Err(e) => return Err(e),
        };

        let mut created = Vec::new();
        for attr in &schema.attributes {
            match self.create_attribute(&schema.id, attr).await {
                Ok(()) => created.push(attr.key.as_str()),
                Err(e) if e.is_conflict() => {
                    debug!(collection = %schema.id, key = %attr.key, "Attribute already exists");
                }
                Err(e) => return Err(e),
            }
        }
        for key in created {
            self.wait_for_attribute(&schema.id, key).await?;
            info!(collection = %schema.id, key, "Created attribute");
        }

        if existed {
            return Err(AppError::conflict(format!(
                "Collection '{}' already exists",
                schema.id
            )));
        }
        info!(collection = %schema.id, "Created collection");
        Ok(())
    }

    async fn list_documents(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> AppResult<Vec<Document>> {
        let mut url = self.client.url(&self.documents_path(collection))?;
        {
            let mut pairs = url.query_pairs_mut();
            for q in query::encode(query) {
                pairs.append_pair("queries[]", &q);
            }
        }
        let list: DocumentList = self
            .client
            .send_json(self.client.request(Method::GET, url))
            .await?;
        list.documents.into_iter().map(parse_document).collect()
    }

    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Document> {
        let url = self
            .client
            .url(&format!("{}/{id}", self.documents_path(collection)))?;
        let raw: Map<String, Value> = self
            .client
            .send_json(self.client.request(Method::GET, url))
            .await?;
        parse_document(raw)
    }

    async fn create_document(
        &self,
        collection: &str,
        data: Map<String, Value>,
        permissions: &[Permission],
    ) -> AppResult<Document> {
        let url = self.client.url(&self.documents_path(collection))?;
        let permissions: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
        let body = json!({
            "documentId": "unique()",
            "data": data,
            "permissions": permissions,
        });
        let raw: Map<String, Value> = self
            .client
            .send_json(self.client.request(Method::POST, url).json(&body))
            .await?;
        parse_document(raw)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> AppResult<Document> {
        let url = self
            .client
            .url(&format!("{}/{id}", self.documents_path(collection)))?;
        let raw: Map<String, Value> = self
            .client
            .send_json(
                self.client
                    .request(Method::PATCH, url)
                    .json(&json!({"data": patch})),
            )
            .await?;
        parse_document(raw)
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        let url = self
            .client
            .url(&format!("{}/{id}", self.documents_path(collection)))?;
        self.client
            .send_empty(self.client.request(Method::DELETE, url))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::types::Role;

    #[test]
    fn test_parse_document_splits_system_fields() {
        let raw = json!({
            "$id": "img1",
            "$collectionId": "images",
            "$databaseId": "portfolio_db",
            "$createdAt": "2026-03-01T10:00:00.000+00:00",
            "$updatedAt": "2026-03-01T10:05:00.000+00:00",
            "$permissions": ["read(\"any\")", "delete(\"any\")"],
            "folder_id": "f1",
            "image_url": "https://x/y.png",
            "storage_path": ""
        });
        let doc = parse_document(raw.as_object().cloned().unwrap()).unwrap();
        assert_eq!(doc.id, "img1");
        assert_eq!(doc.collection, "images");
        assert_eq!(doc.permissions, vec![Permission::read(Role::Any), Permission::delete(Role::Any)]);
        assert_eq!(doc.get_str("folder_id"), Some("f1"));
        assert!(!doc.data.contains_key("$databaseId"));
        assert!(doc.updated_at > doc.created_at);
    }

    #[test]
    fn test_parse_document_requires_id() {
        let raw = json!({"$collectionId": "images", "name": "x"});
        let err = parse_document(raw.as_object().cloned().unwrap()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
    }
}
