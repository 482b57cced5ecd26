//! Document store trait for pluggable persistence backends.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::result::AppResult;
use crate::schema::CollectionSchema;
use crate::types::{Document, DocumentQuery, Permission};

/// A schemaless document store scoped to a single database.
///
/// Implementations exist for the hosted backend service, PostgreSQL, and
/// memory. Missing documents or collections surface as `NotFound`;
/// creating something that already exists surfaces as `Conflict`.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "appwrite", "postgres").
    fn backend_type(&self) -> &str;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Create the database this store is scoped to.
    async fn create_database(&self, name: &str) -> AppResult<()>;

    /// Create a collection and its attributes.
    async fn create_collection(&self, schema: &CollectionSchema) -> AppResult<()>;

    /// List documents matching a query.
    async fn list_documents(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> AppResult<Vec<Document>>;

    /// Fetch one document.
    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Document>;

    /// Create a document with a store-assigned id.
    async fn create_document(
        &self,
        collection: &str,
        data: Map<String, Value>,
        permissions: &[Permission],
    ) -> AppResult<Document>;

    /// Apply a partial update. Omitted attributes keep their values.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> AppResult<Document>;

    /// Delete one document.
    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()>;
}
