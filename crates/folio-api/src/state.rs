//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use folio_auth::AdminAuthenticator;
use folio_core::config::AppConfig;
use folio_service::{Assistant, Backend, CleanupQueue, GalleryStore, ServiceContext};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Document store and bucket handles
    pub backend: Backend,
    /// Shared gallery state
    pub store: Arc<GalleryStore>,
    /// Pending storage deletes
    pub cleanup: Arc<CleanupQueue>,
    /// Admin authentication
    pub auth: Arc<AdminAuthenticator>,
    /// Chat assistant
    pub assistant: Arc<Assistant>,
    /// Process start, for uptime
    pub started_at: Instant,
}

impl AppState {
    /// Build handler state from the service context.
    pub fn new(ctx: &ServiceContext) -> Self {
        Self {
            config: Arc::clone(&ctx.config),
            backend: ctx.backend.clone(),
            store: Arc::clone(&ctx.store),
            cleanup: Arc::clone(&ctx.cleanup),
            auth: Arc::clone(&ctx.auth),
            assistant: Arc::clone(&ctx.assistant),
            started_at: Instant::now(),
        }
    }
}
