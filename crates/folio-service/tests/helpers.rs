//! Shared fixtures for service tests.

#![allow(dead_code)]

use bytes::Bytes;

use folio_auth::PasswordHasher;
use folio_core::config::AppConfig;
use folio_database::MemoryDocumentStore;
use folio_entity::UploadFile;
use folio_service::backend::BackendIds;
use folio_service::{Backend, ServiceContext};
use folio_storage::MemoryObjectStorage;

pub const ADMIN_PASSWORD: &str = "violet-harbour-tangent-91";

/// A context over memory providers, plus the providers themselves.
pub struct TestGallery {
    pub ctx: ServiceContext,
    pub documents: MemoryDocumentStore,
    pub storage: MemoryObjectStorage,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "service-test-secret".into();
    config.auth.admin_password_hash = PasswordHasher::new()
        .hash_password(ADMIN_PASSWORD)
        .unwrap();
    config.gallery.cleanup_interval_seconds = 0;
    config
}

pub fn setup() -> TestGallery {
    let ids = BackendIds::default();
    let documents = MemoryDocumentStore::with_collections([ids.folders_schema(), ids.images_schema()]);
    let storage = MemoryObjectStorage::with_policy("http://localhost:8080", ids.bucket_policy());
    let backend = Backend::memory_with(documents.clone(), storage.clone());
    TestGallery {
        ctx: ServiceContext::new(test_config(), backend),
        documents,
        storage,
    }
}

pub fn png(name: &str) -> UploadFile {
    UploadFile::new(name, Bytes::from_static(b"\x89PNG\r\n\x1a\n")).with_content_type("image/png")
}
