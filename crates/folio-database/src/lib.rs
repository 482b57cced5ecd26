//! # folio-database
//!
//! Document store providers for Folio: a PostgreSQL store that keeps each
//! document as a JSONB row, and an in-memory store for tests and throwaway
//! runs. Both validate writes against the registered collection schema.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;

pub use connection::DatabasePool;
pub use memory::{DocumentOp, MemoryDocumentStore};
pub use postgres::PostgresDocumentStore;
