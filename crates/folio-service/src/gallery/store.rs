//! Shared gallery state.
//!
//! Every entry point reads folders through one [`GalleryStore`] and writes
//! through it, so there is a single cached listing per sort direction and
//! any mutation drops it. Concurrent readers of a cold cache share one
//! backend fetch.
//!
//! Listings are keyed by a generation that every mutation bumps, so a load
//! that started before a write can only fill a slot no reader asks for.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, error};

use folio_core::result::AppResult;
use folio_core::types::{FolderId, ImageId, SortDirection};
use folio_entity::{Folder, Image, UpdateFolder, UploadFile};

use super::filter::filter_by_name;
use super::service::{GalleryService, UploadReport};

/// A listing for display: never fails, but carries the error that left it
/// empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Listing {
    /// Folders in display order.
    pub folders: Vec<Folder>,
    /// Why the listing could not be loaded.
    pub error: Option<String>,
}

/// Cached, invalidating front for [`GalleryService`].
#[derive(Debug, Clone)]
pub struct GalleryStore {
    service: Arc<GalleryService>,
    folders: Cache<(SortDirection, u64), Arc<Vec<Folder>>>,
    generation: Arc<AtomicU64>,
}

impl GalleryStore {
    /// Cache listings for at most `ttl`.
    pub fn new(service: Arc<GalleryService>, ttl: Duration) -> Self {
        Self {
            service,
            folders: Cache::builder().max_capacity(4).time_to_live(ttl).build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The underlying service.
    pub fn service(&self) -> &Arc<GalleryService> {
        &self.service
    }

    /// Folders with their images, from cache when fresh.
    pub async fn folders(&self, direction: SortDirection) -> AppResult<Arc<Vec<Folder>>> {
        let service = Arc::clone(&self.service);
        let generation = self.generation.load(Ordering::Acquire);
        self.folders
            .try_get_with((direction, generation), async move {
                debug!(?direction, generation, "Loading folder listing");
                service.list_folders(direction).await.map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())
    }

    /// Folders whose name contains `query`, with load errors folded into
    /// the result.
    pub async fn listing(&self, direction: SortDirection, query: &str) -> Listing {
        match self.folders(direction).await {
            Ok(folders) => Listing {
                folders: filter_by_name(&folders, query),
                error: None,
            },
            Err(e) => {
                error!(error = %e, "Folder listing unavailable");
                Listing {
                    folders: Vec::new(),
                    error: Some(e.message),
                }
            }
        }
    }

    /// Drop every cached listing.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.folders.invalidate_all();
    }

    /// See [`GalleryService::get_folder`].
    pub async fn get_folder(&self, id: &FolderId) -> AppResult<Folder> {
        self.service.get_folder(id).await
    }

    /// See [`GalleryService::create_folder`].
    pub async fn create_folder(&self, name: &str) -> AppResult<Folder> {
        let folder = self.service.create_folder(name).await?;
        self.invalidate();
        Ok(folder)
    }

    /// See [`GalleryService::update_folder`].
    pub async fn update_folder(&self, id: &FolderId, patch: UpdateFolder) -> AppResult<Folder> {
        let folder = self.service.update_folder(id, patch).await?;
        self.invalidate();
        Ok(folder)
    }

    /// See [`GalleryService::delete_folder`]. Invalidates even on failure,
    /// since part of the cascade may have run.
    pub async fn delete_folder(&self, id: &FolderId) -> AppResult<()> {
        let result = self.service.delete_folder(id).await;
        self.invalidate();
        result
    }

    /// See [`GalleryService::upload_images`].
    pub async fn upload_images(
        &self,
        folder_id: &FolderId,
        files: Vec<UploadFile>,
    ) -> AppResult<UploadReport> {
        let report = self.service.upload_images(folder_id, files).await?;
        self.invalidate();
        Ok(report)
    }

    /// See [`GalleryService::add_image_url`].
    pub async fn add_image_url(
        &self,
        folder_id: &FolderId,
        url: &str,
        position: u32,
    ) -> AppResult<Image> {
        let image = self.service.add_image_url(folder_id, url, position).await?;
        self.invalidate();
        Ok(image)
    }

    /// See [`GalleryService::delete_image`].
    pub async fn delete_image(&self, id: &ImageId) -> AppResult<()> {
        let result = self.service.delete_image(id).await;
        self.invalidate();
        result
    }
}
