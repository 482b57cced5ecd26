//! # folio-storage
//!
//! Object storage providers for Folio: a local filesystem bucket and an
//! in-memory bucket. Both enforce the bucket's upload policy and assign
//! object keys themselves, matching the hosted backend's contract.

pub mod local;
pub mod memory;
pub mod mime;

pub use local::LocalObjectStorage;
pub use memory::{MemoryObjectStorage, StorageOp};

use folio_core::types::ObjectKey;

/// View URL for objects served by the Folio API itself.
pub fn api_view_url(public_url: &str, key: &ObjectKey) -> String {
    format!("{}/api/files/{}", public_url.trim_end_matches('/'), key)
}
