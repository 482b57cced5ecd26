//! Backend assembly: picks the document and object providers named in
//! configuration and hands them out as trait objects.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use folio_appwrite::{AppwriteClient, AppwriteDocumentStore, AppwriteObjectStorage};
use folio_core::config::{AppConfig, BackendConfig};
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::schema::{BucketPolicy, CollectionSchema};
use folio_core::traits::{DocumentStore, ObjectStorage};
use folio_database::migration::run_migrations;
use folio_database::{DatabasePool, MemoryDocumentStore, PostgresDocumentStore};
use folio_storage::{LocalObjectStorage, MemoryObjectStorage};

/// Database, collection, and bucket identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendIds {
    /// Database identifier.
    pub database: String,
    /// Folder collection identifier.
    pub folders: String,
    /// Image collection identifier.
    pub images: String,
    /// Image bucket identifier.
    pub bucket: String,
}

impl BackendIds {
    /// Identifiers from the `[backend]` section.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            database: config.database_id.clone(),
            folders: config.folders_collection.clone(),
            images: config.images_collection.clone(),
            bucket: config.bucket_id.clone(),
        }
    }

    /// Schema of the folder collection.
    pub fn folders_schema(&self) -> CollectionSchema {
        CollectionSchema::folders(&self.folders)
    }

    /// Schema of the image collection.
    pub fn images_schema(&self) -> CollectionSchema {
        CollectionSchema::images(&self.images)
    }

    /// Upload policy of the image bucket.
    pub fn bucket_policy(&self) -> BucketPolicy {
        BucketPolicy::project_images(&self.bucket)
    }
}

impl Default for BackendIds {
    fn default() -> Self {
        Self::from_config(&BackendConfig::default())
    }
}

/// Result of probing both providers.
#[derive(Debug, Clone, Serialize)]
pub struct BackendHealth {
    /// Document provider name.
    pub documents_backend: String,
    /// Whether the document provider answered.
    pub documents: bool,
    /// Object provider name.
    pub storage_backend: String,
    /// Whether the object provider answered.
    pub storage: bool,
}

impl BackendHealth {
    /// Both providers are reachable.
    pub fn is_healthy(&self) -> bool {
        self.documents && self.storage
    }
}

/// Typed handles to the document store and the image bucket.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Document collections.
    pub documents: Arc<dyn DocumentStore>,
    /// Image bucket.
    pub storage: Arc<dyn ObjectStorage>,
    /// Identifiers the handles are bound to.
    pub ids: BackendIds,
}

impl Backend {
    /// Wrap existing providers.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn ObjectStorage>,
        ids: BackendIds,
    ) -> Self {
        Self {
            documents,
            storage,
            ids,
        }
    }

    /// In-process providers with collections and bucket already present.
    pub fn memory(public_url: &str) -> Self {
        let ids = BackendIds::default();
        Self::memory_with(
            MemoryDocumentStore::with_collections([ids.folders_schema(), ids.images_schema()]),
            MemoryObjectStorage::with_policy(public_url, ids.bucket_policy()),
        )
    }

    /// Wrap caller-held memory providers so tests can inspect them.
    pub fn memory_with(documents: MemoryDocumentStore, storage: MemoryObjectStorage) -> Self {
        Self::new(Arc::new(documents), Arc::new(storage), BackendIds::default())
    }

    /// Build the providers named by `backend.documents` and `backend.storage`.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let backend = &config.backend;
        let ids = BackendIds::from_config(backend);

        let needs_client = backend.documents == "appwrite" || backend.storage == "appwrite";
        let client = if needs_client {
            Some(Arc::new(AppwriteClient::new(backend)?))
        } else {
            None
        };

        let documents: Arc<dyn DocumentStore> = match backend.documents.as_str() {
            "appwrite" => Arc::new(AppwriteDocumentStore::new(
                require_client(&client)?,
                &ids.database,
            )),
            "postgres" => {
                let pool = DatabasePool::connect(&config.database).await?;
                run_migrations(pool.pool()).await?;
                Arc::new(PostgresDocumentStore::new(pool.into_pool(), &ids.database))
            }
            "memory" => {
                warn!("Using in-memory document store; data is lost on restart");
                Arc::new(MemoryDocumentStore::with_collections([
                    ids.folders_schema(),
                    ids.images_schema(),
                ]))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown document backend '{other}'"
                )));
            }
        };

        let storage: Arc<dyn ObjectStorage> = match backend.storage.as_str() {
            "appwrite" => Arc::new(AppwriteObjectStorage::new(
                require_client(&client)?,
                &ids.bucket,
            )),
            "local" => Arc::new(
                LocalObjectStorage::new(
                    &config.storage.root_path,
                    &ids.bucket,
                    &config.server.public_url,
                )
                .await?,
            ),
            "memory" => {
                warn!("Using in-memory object storage; uploads are lost on restart");
                Arc::new(MemoryObjectStorage::with_policy(
                    &config.server.public_url,
                    ids.bucket_policy(),
                ))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage backend '{other}'"
                )));
            }
        };

        info!(
            documents = documents.backend_type(),
            storage = storage.provider_type(),
            database = %ids.database,
            bucket = %ids.bucket,
            "Backend initialized"
        );
        Ok(Self::new(documents, storage, ids))
    }

    /// Probe both providers. Errors are logged and reported as unhealthy.
    pub async fn health(&self) -> BackendHealth {
        let documents = match self.documents.health_check().await {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, "Document store health check failed");
                false
            }
        };
        let storage = match self.storage.health_check().await {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, "Object storage health check failed");
                false
            }
        };
        BackendHealth {
            documents_backend: self.documents.backend_type().to_string(),
            documents,
            storage_backend: self.storage.provider_type().to_string(),
            storage,
        }
    }
}

fn require_client(client: &Option<Arc<AppwriteClient>>) -> AppResult<Arc<AppwriteClient>> {
    client
        .clone()
        .ok_or_else(|| AppError::internal("Hosted backend client was not initialized"))
}
