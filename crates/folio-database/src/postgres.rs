//! PostgreSQL document store.
//!
//! Documents live in a single `documents` table keyed by
//! `(database_id, collection_id, id)` with their attributes in a JSONB
//! column. Collection schemas are registered in `doc_collections` and
//! checked on every write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::schema::CollectionSchema;
use folio_core::traits::DocumentStore;
use folio_core::types::document::CREATED_AT;
use folio_core::types::id::generate_id;
use folio_core::types::{Document, DocumentQuery, FilterOp, Permission};

const DOCUMENT_COLUMNS: &str = "id, collection_id, data, permissions, created_at, updated_at";

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    collection_id: String,
    data: Json<Map<String, Value>>,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self) -> AppResult<Document> {
        let permissions = self
            .permissions
            .iter()
            .map(|p| p.parse::<Permission>())
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Document {
            id: self.id,
            collection: self.collection_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            permissions,
            data: self.data.0,
        })
    }
}

/// Document store backed by PostgreSQL, scoped to one logical database.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
    database_id: String,
}

impl PostgresDocumentStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool, database_id: impl Into<String>) -> Self {
        Self {
            pool,
            database_id: database_id.into(),
        }
    }

    async fn load_schema(&self, collection: &str) -> AppResult<CollectionSchema> {
        let schema: Option<Json<CollectionSchema>> = sqlx::query_scalar(
            "SELECT schema FROM doc_collections WHERE database_id = $1 AND id = $2",
        )
        .bind(&self.database_id)
        .bind(collection)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "Failed to load collection schema"))?;

        schema
            .map(|s| s.0)
            .ok_or_else(|| AppError::not_found(format!("Collection '{collection}' not found")))
    }
}

/// Map sqlx errors, surfacing unique and foreign key violations as
/// `Conflict` and `NotFound`.
fn map_sqlx(err: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::conflict(format!("{context}: already exists"));
        }
        if db.is_foreign_key_violation() {
            return AppError::not_found(format!("{context}: parent resource not found"));
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}

/// Append the SQL expression that reads an attribute, system or user.
fn push_attribute(builder: &mut QueryBuilder<'_, Postgres>, field: &str) {
    match field {
        "$id" => {
            builder.push("to_jsonb(id)");
        }
        CREATED_AT => {
            builder.push("created_at");
        }
        "$updatedAt" => {
            builder.push("updated_at");
        }
        other => {
            builder.push("(data -> ");
            builder.push_bind(other.to_string());
            builder.push(")");
        }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn backend_type(&self) -> &str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    async fn create_database(&self, name: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO doc_databases (id, name) VALUES ($1, $2)")
            .bind(&self.database_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx(e, &format!("Database '{}'", self.database_id)))?;

        info!(database_id = %self.database_id, "Created database");
        Ok(())
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO doc_collections (database_id, id, name, schema) VALUES ($1, $2, $3, $4)",
        )
        .bind(&self.database_id)
        .bind(&schema.id)
        .bind(&schema.name)
        .bind(Json(schema))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, &format!("Collection '{}'", schema.id)))?;

        info!(collection = %schema.id, "Created collection");
        Ok(())
    }

    async fn list_documents(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> AppResult<Vec<Document>> {
        self.load_schema(collection).await?;

        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(DOCUMENT_COLUMNS);
        builder.push(" FROM documents WHERE database_id = ");
        builder.push_bind(self.database_id.clone());
        builder.push(" AND collection_id = ");
        builder.push_bind(collection.to_string());

        for filter in &query.filters {
            builder.push(" AND ");
            if filter.field == CREATED_AT || filter.field == "$updatedAt" {
                return Err(AppError::validation(
                    "Timestamp attributes cannot be used as equality filters",
                ));
            }
            push_attribute(&mut builder, &filter.field);
            match filter.op {
                FilterOp::Equal => builder.push(" = "),
                FilterOp::NotEqual => builder.push(" IS DISTINCT FROM "),
            };
            builder.push_bind(Json(filter.value.clone()));
        }

        let direction = query
            .sort
            .as_ref()
            .map(|s| s.direction.as_sql())
            .unwrap_or("ASC");
        builder.push(" ORDER BY ");
        match &query.sort {
            Some(sort) => push_attribute(&mut builder, &sort.field),
            None => {
                builder.push("created_at");
            }
        }
        builder.push(format!(" {direction}, seq {direction}"));

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(i64::from(limit));
        }

        let rows: Vec<DocumentRow> = builder
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx(e, "Failed to list documents"))?;

        debug!(collection, count = rows.len(), "Listed documents");
        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn get_document(&self, collection: &str, id: &str) -> AppResult<Document> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents \
             WHERE database_id = $1 AND collection_id = $2 AND id = $3"
        ))
        .bind(&self.database_id)
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "Failed to get document"))?;

        row.ok_or_else(|| {
            AppError::not_found(format!("Document '{id}' not found in '{collection}'"))
        })?
        .into_document()
    }

    async fn create_document(
        &self,
        collection: &str,
        mut data: Map<String, Value>,
        permissions: &[Permission],
    ) -> AppResult<Document> {
        let schema = self.load_schema(collection).await?;
        schema.validate(&data)?;
        schema.apply_defaults(&mut data);

        let permissions: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
        let row: DocumentRow = sqlx::query_as(&format!(
            "INSERT INTO documents (database_id, collection_id, id, data, permissions) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(&self.database_id)
        .bind(collection)
        .bind(generate_id())
        .bind(Json(&data))
        .bind(&permissions)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "Failed to create document"))?;

        row.into_document()
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> AppResult<Document> {
        let schema = self.load_schema(collection).await?;
        schema.validate_patch(&patch)?;

        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "UPDATE documents SET data = data || $4, updated_at = now() \
             WHERE database_id = $1 AND collection_id = $2 AND id = $3 \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(&self.database_id)
        .bind(collection)
        .bind(id)
        .bind(Json(&patch))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "Failed to update document"))?;

        row.ok_or_else(|| {
            AppError::not_found(format!("Document '{id}' not found in '{collection}'"))
        })?
        .into_document()
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE database_id = $1 AND collection_id = $2 AND id = $3",
        )
        .bind(&self.database_id)
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "Failed to delete document"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Document '{id}' not found in '{collection}'"
            )));
        }
        Ok(())
    }
}
