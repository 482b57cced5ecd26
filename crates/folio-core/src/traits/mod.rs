//! Backend traits implemented by the provider crates.

pub mod document;
pub mod storage;

pub use document::DocumentStore;
pub use storage::{ObjectContent, ObjectStorage, ObjectUpload, StoredObject};
