//! # folio-core
//!
//! Core crate for Folio. Contains configuration schemas, typed
//! identifiers, the document/query/permission model, collection and
//! bucket schemas, the backend traits, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Folio crates.

pub mod config;
pub mod error;
pub mod result;
pub mod schema;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
