//! # folio-appwrite
//!
//! Adapter for the hosted Appwrite backend. A single [`AppwriteClient`]
//! carries the endpoint, project, and API key; [`AppwriteDocumentStore`]
//! and [`AppwriteObjectStorage`] implement the core backend traits on top
//! of it.

pub mod client;
pub mod documents;
pub mod query;
pub mod storage;

pub use client::AppwriteClient;
pub use documents::AppwriteDocumentStore;
pub use storage::AppwriteObjectStorage;
