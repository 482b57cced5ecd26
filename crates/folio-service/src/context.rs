//! Application-wide service wiring.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use folio_auth::AdminAuthenticator;
use folio_core::config::AppConfig;
use folio_core::result::AppResult;

use crate::assistant::Assistant;
use crate::backend::Backend;
use crate::cleanup::CleanupQueue;
use crate::gallery::{AdminConsole, GalleryService, GalleryStore};

/// Every long-lived service, built once per process.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Provider handles.
    pub backend: Backend,
    /// Pending storage deletes.
    pub cleanup: Arc<CleanupQueue>,
    /// Shared gallery state.
    pub store: Arc<GalleryStore>,
    /// Admin authentication.
    pub auth: Arc<AdminAuthenticator>,
    /// Chat assistant.
    pub assistant: Arc<Assistant>,
}

impl ServiceContext {
    /// Wire services over an existing backend.
    pub fn new(config: AppConfig, backend: Backend) -> Self {
        let cleanup = Arc::new(CleanupQueue::new(Arc::clone(&backend.storage)));
        let gallery = Arc::new(GalleryService::new(
            &backend,
            Arc::clone(&cleanup),
            &config.gallery,
        ));
        let store = Arc::new(GalleryStore::new(
            gallery,
            Duration::from_secs(config.gallery.cache_ttl_seconds),
        ));
        let auth = Arc::new(AdminAuthenticator::new(&config.auth));
        let assistant = Arc::new(Assistant::new(config.assistant.clone()));

        Self {
            config: Arc::new(config),
            backend,
            cleanup,
            store,
            auth,
            assistant,
        }
    }

    /// Build the backend named in configuration, then wire services.
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let backend = Backend::from_config(&config).await?;
        Ok(Self::new(config, backend))
    }

    /// A fresh admin console sharing this context's store.
    pub fn console(&self) -> AdminConsole {
        AdminConsole::new(Arc::clone(&self.auth), Arc::clone(&self.store))
    }

    /// Start the periodic cleanup task, unless disabled by a zero interval.
    pub fn spawn_cleanup(&self, shutdown: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        let interval = self.config.gallery.cleanup_interval_seconds;
        if interval == 0 {
            info!("Periodic storage cleanup disabled");
            return None;
        }
        Some(Arc::clone(&self.cleanup).spawn(Duration::from_secs(interval), shutdown))
    }
}
