//! # folio-service
//!
//! Business logic for the Folio gallery. Services are wired once at
//! startup from a [`Backend`] and shared through `Arc`s by the HTTP API,
//! the CLI, and the interactive admin console.

pub mod assistant;
pub mod backend;
pub mod cleanup;
pub mod context;
pub mod gallery;
pub mod provision;

pub use assistant::{Assistant, AssistantReply};
pub use backend::{Backend, BackendHealth, BackendIds};
pub use cleanup::{CleanupQueue, CleanupReport, PendingCleanup};
pub use context::ServiceContext;
pub use gallery::{
    AdminConsole, AdminView, AuthState, FolderForm, GalleryService, GalleryStore, Listing,
    LoginError, UploadFailure, UploadReport, filter_by_name,
};
pub use provision::{ProvisionOutcome, ProvisionReport, ProvisionStep};
