//! Folder entity.

pub mod model;
