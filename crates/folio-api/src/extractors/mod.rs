//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::AdminUser;
pub use json::ValidatedJson;
