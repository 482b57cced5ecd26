//! Request handlers, grouped by resource.

pub mod admin;
pub mod assistant;
pub mod auth;
pub mod files;
pub mod folders;
pub mod health;
pub mod images;
