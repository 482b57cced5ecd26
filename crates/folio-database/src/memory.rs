//! In-memory document store.
//!
//! Keeps documents per collection in insertion order and validates writes
//! against the registered schema, like the hosted backend does. Failures
//! can be injected per operation and every call is recorded, so service
//! tests can assert on the exact sequence of backend calls.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::schema::CollectionSchema;
use folio_core::traits::DocumentStore;
use folio_core::types::document::CREATED_AT;
use folio_core::types::id::generate_id;
use folio_core::types::{Document, DocumentQuery, Permission, SortDirection};

/// Store operations that can be recorded or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentOp {
    /// `list_documents`
    List,
    /// `get_document`
    Get,
    /// `create_document`
    Create,
    /// `update_document`
    Update,
    /// `delete_document`
    Delete,
}

impl fmt::Display for DocumentOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct MemoryCollection {
    schema: CollectionSchema,
    documents: Vec<Document>,
}

/// In-memory [`DocumentStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    database: Arc<Mutex<Option<String>>>,
    collections: Arc<DashMap<String, MemoryCollection>>,
    failures: Arc<DashMap<(DocumentOp, String), ErrorKind>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store with no database or collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the database and the given collections already
    /// provisioned.
    pub fn with_collections(schemas: impl IntoIterator<Item = CollectionSchema>) -> Self {
        let store = Self::default();
        for schema in schemas {
            store.collections.insert(
                schema.id.clone(),
                MemoryCollection {
                    schema,
                    documents: Vec::new(),
                },
            );
        }
        store
    }

    /// Make the next `op` on `target` fail with `kind`. The target is the
    /// document id for get/update/delete and the collection id for
    /// list/create.
    pub fn fail_next(&self, op: DocumentOp, target: impl Into<String>, kind: ErrorKind) {
        self.failures.insert((op, target.into()), kind);
    }

    /// Recorded calls, formatted as `"{op} {collection}/{target}"`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Number of documents currently in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.documents.len())
            .unwrap_or(0)
    }

    async fn record(&self, op: DocumentOp, collection: &str, target: &str) -> AppResult<()> {
        self.calls
            .lock()
            .await
            .push(format!("{op} {collection}/{target}"));
        match self.failures.remove(&(op, target.to_string())) {
            Some((_, kind)) => Err(AppError::new(
                kind,
                format!("Simulated {op} failure for '{target}'"),
            )),
            None => Ok(()),
        }
    }

    fn missing_collection(collection: &str) -> AppError {
        AppError::not_found(format!("Collection '{collection}' not found"))
    }

    fn missing_document(collection: &str, id: &str) -> AppError {
        AppError::not_found(format!("Document '{id}' not found in '{collection}'"))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn create_database(&self, name: &str) -> AppResult<()> {
        let mut database = self.database.lock().await;
        if database.is_some() || !self.collections.is_empty() {
            return Err(AppError::conflict("Database already exists"));
        }
        *database = Some(name.to_string());
        Ok(())
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> AppResult<()> {
        if self.collections.contains_key(&schema.id) {
            return Err(AppError::conflict(format!(
                "Collection '{}' already exists",
                schema.id
            )));
        }
        self.collections.insert(
            schema.id.clone(),
            MemoryCollection {
                schema: schema.clone(),
                documents: Vec::new(),
            },
        );
        Ok(())
    }

    async fn list_documents(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> AppResult<Vec<Document>> {
        self.record(DocumentOp::List, collection, collection).await?;
        let entry = self
            .collections
            .get(collection)
            .ok_or_else(|| Self::missing_collection(collection))?;

        let mut matched: Vec<(usize, Document)> = entry
            .documents
            .iter()
            .filter(|doc| {
                query
                    .filters
                    .iter()
                    .all(|f| f.matches(doc.attribute(&f.field).as_ref()))
            })
            .cloned()
            .enumerate()
            .collect();
        drop(entry);

        if let Some(sort) = &query.sort {
            if sort.field == CREATED_AT {
                matched.sort_by_key(|(seq, doc)| (doc.created_at, *seq));
            } else {
                matched.sort_by(|(a_seq, a), (b_seq, b)| {
                    let a_key = a.attribute(&sort.field).map(|v| v.to_string());
                    let b_key = b.attribute(&sort.field).map(|v| v.to_string());
                    a_key.cmp(&b_key).then(a_seq.cmp(b_seq))
                });
            }
            if sort.direction == SortDirection::Desc {
                matched.reverse();
            }
        }

        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(matched.into_iter().map(|(_, doc)| doc).take(limit).collect())
    }

    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Document> {
        self.record(DocumentOp::Get, collection, id).await?;
        let entry = self
            .collections
            .get(collection)
            .ok_or_else(|| Self::missing_collection(collection))?;
        entry
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| Self::missing_document(collection, id))
    }

    async fn create_document(
        &self,
        collection: &str,
        mut data: Map<String, Value>,
        permissions: &[Permission],
    ) -> AppResult<Document> {
        self.record(DocumentOp::Create, collection, collection).await?;
        let mut entry = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing_collection(collection))?;
        entry.schema.validate(&data)?;
        entry.schema.apply_defaults(&mut data);

        let now = Utc::now();
        let document = Document {
            id: generate_id(),
            collection: collection.to_string(),
            created_at: now,
            updated_at: now,
            permissions: permissions.to_vec(),
            data,
        };
        entry.documents.push(document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> AppResult<Document> {
        self.record(DocumentOp::Update, collection, id).await?;
        let mut entry = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing_collection(collection))?;
        entry.schema.validate_patch(&patch)?;

        let document = entry
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Self::missing_document(collection, id))?;
        document.data.extend(patch);
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        self.record(DocumentOp::Delete, collection, id).await?;
        let mut entry = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing_collection(collection))?;
        let before = entry.documents.len();
        entry.documents.retain(|d| d.id != id);
        if entry.documents.len() == before {
            return Err(Self::missing_document(collection, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::types::{FilterField, Role, SortField};
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn store() -> MemoryDocumentStore {
        MemoryDocumentStore::with_collections([
            CollectionSchema::folders("folders"),
            CollectionSchema::images("images"),
        ])
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let store = store();
        let perms = Permission::full_access(Role::Any);
        let doc = store
            .create_document("folders", body(json!({"name": "Alpha"})), &perms)
            .await
            .unwrap();
        assert_eq!(doc.permissions.len(), 4);

        let fetched = store.get_document("folders", &doc.id).await.unwrap();
        assert_eq!(fetched.get_str("name"), Some("Alpha"));

        let updated = store
            .update_document("folders", &doc.id, body(json!({"name": "Beta"})))
            .await
            .unwrap();
        assert_eq!(updated.get_str("name"), Some("Beta"));

        store.delete_document("folders", &doc.id).await.unwrap();
        let err = store.get_document("folders", &doc.id).await.unwrap_err();
        assert!(err.is_not_found());
        let err = store.delete_document("folders", &doc.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_schema_violations_are_rejected() {
        let store = store();
        let err = store
            .create_document("images", body(json!({"folder_id": "f1"})), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(store.count("images"), 0);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = store
            .list_documents("folders", &DocumentQuery::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_filter_sort_and_limit() {
        let store = store();
        for (folder, url) in [("f1", "a"), ("f2", "b"), ("f1", "c"), ("f1", "d")] {
            store
                .create_document(
                    "images",
                    body(json!({"folder_id": folder, "image_url": url})),
                    &[],
                )
                .await
                .unwrap();
        }

        let asc = store
            .list_documents(
                "images",
                &DocumentQuery::new()
                    .filter(FilterField::eq("folder_id", "f1"))
                    .sort(SortField::created_at(SortDirection::Asc)),
            )
            .await
            .unwrap();
        let urls: Vec<_> = asc.iter().filter_map(|d| d.get_str("image_url")).collect();
        assert_eq!(urls, vec!["a", "c", "d"]);

        let desc = store
            .list_documents(
                "images",
                &DocumentQuery::new()
                    .sort(SortField::created_at(SortDirection::Desc))
                    .limit(2),
            )
            .await
            .unwrap();
        let urls: Vec<_> = desc.iter().filter_map(|d| d.get_str("image_url")).collect();
        assert_eq!(urls, vec!["d", "c"]);
    }

    #[tokio::test]
    async fn test_provisioning_conflicts() {
        let store = MemoryDocumentStore::new();
        store.create_database("Portfolio").await.unwrap();
        assert!(store.create_database("Portfolio").await.unwrap_err().is_conflict());
        let schema = CollectionSchema::folders("folders");
        store.create_collection(&schema).await.unwrap();
        assert!(store.create_collection(&schema).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot_and_recorded() {
        let store = store();
        store.fail_next(DocumentOp::Create, "folders", ErrorKind::Transport);
        let err = store
            .create_document("folders", body(json!({"name": "A"})), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
        store
            .create_document("folders", body(json!({"name": "A"})), &[])
            .await
            .unwrap();
        assert_eq!(
            store.calls().await,
            vec!["create folders/folders", "create folders/folders"]
        );
    }
}
