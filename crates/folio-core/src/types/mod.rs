//! Shared value types: identifiers, documents, permissions, queries, and
//! API response envelopes.

pub mod document;
pub mod id;
pub mod permission;
pub mod query;
pub mod response;

pub use document::Document;
pub use id::{FolderId, ImageId, ObjectKey};
pub use permission::{Permission, PermissionAction, Role};
pub use query::{DocumentQuery, FilterField, FilterOp, SortDirection, SortField};
pub use response::{ApiErrorResponse, ApiResponse};
