//! # folio-entity
//!
//! Gallery entity models for Folio. Every struct in this crate is either
//! an application-level view of a stored document (`Folder`, `Image`) or
//! the input needed to create or change one. Conversions to and from the
//! schemaless [`folio_core::types::Document`] live next to each model.

pub mod folder;
pub mod image;

pub use folder::model::{CreateFolder, Folder, UpdateFolder};
pub use image::model::{CreateImage, Image, UploadFile};
