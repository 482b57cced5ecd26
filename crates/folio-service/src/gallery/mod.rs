//! Folder and image management.

pub mod console;
pub mod filter;
pub mod service;
pub mod store;

pub use console::{AdminConsole, AdminView, AuthState, FolderForm, LoginError};
pub use filter::filter_by_name;
pub use service::{GalleryService, UploadFailure, UploadReport};
pub use store::{GalleryStore, Listing};
