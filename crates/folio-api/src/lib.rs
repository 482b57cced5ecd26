//! # folio-api
//!
//! HTTP API layer for Folio built on Axum.
//!
//! Provides the gallery, admin, file, and assistant endpoints, the bearer
//! token extractor, CORS/compression/trace middleware, DTOs, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
