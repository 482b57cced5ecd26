//! Folder and image persistence over the document store and bucket.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use folio_core::config::GalleryConfig;
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::traits::{DocumentStore, ObjectStorage, ObjectUpload};
use folio_core::types::{
    Document, DocumentQuery, FilterField, FolderId, ImageId, Permission, Role, SortDirection,
    SortField,
};
use folio_entity::{CreateFolder, CreateImage, Folder, Image, UpdateFolder, UploadFile};
use folio_storage::mime::resolve_mime;

use crate::backend::{Backend, BackendIds};
use crate::cleanup::CleanupQueue;

/// The file that stopped a batch upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadFailure {
    /// Name of the failing file.
    pub file_name: String,
    /// Why it failed.
    #[serde(serialize_with = "serialize_error")]
    pub error: AppError,
}

fn serialize_error<S: serde::Serializer>(error: &AppError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&error.to_string())
}

/// Outcome of a sequential batch upload.
///
/// Images uploaded before a failure stay persisted; files after it are
/// never attempted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    /// Images persisted by this batch, in file order.
    pub uploaded: Vec<Image>,
    /// The failure that ended the batch early.
    pub failure: Option<UploadFailure>,
}

impl UploadReport {
    /// Every file was persisted.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Persistence for folders and their images.
#[derive(Debug, Clone)]
pub struct GalleryService {
    documents: Arc<dyn DocumentStore>,
    storage: Arc<dyn ObjectStorage>,
    cleanup: Arc<CleanupQueue>,
    ids: BackendIds,
    folder_limit: u32,
    image_limit: u32,
}

impl GalleryService {
    /// Creates a new gallery service.
    pub fn new(backend: &Backend, cleanup: Arc<CleanupQueue>, config: &GalleryConfig) -> Self {
        Self {
            documents: Arc::clone(&backend.documents),
            storage: Arc::clone(&backend.storage),
            cleanup,
            ids: backend.ids.clone(),
            folder_limit: config.folder_limit,
            image_limit: config.image_limit,
        }
    }

    /// Lists folders by creation time, each with its images attached in
    /// image creation order.
    pub async fn list_folders(&self, direction: SortDirection) -> AppResult<Vec<Folder>> {
        let folder_query = DocumentQuery::new()
            .sort(SortField::created_at(direction))
            .limit(self.folder_limit);
        let image_query = DocumentQuery::new()
            .sort(SortField::created_at(SortDirection::Asc))
            .limit(self.image_limit);

        let folder_docs = self
            .documents
            .list_documents(&self.ids.folders, &folder_query)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to list folders"))?;
        let image_docs = self
            .documents
            .list_documents(&self.ids.images, &image_query)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to list images"))?;

        let mut by_folder: HashMap<FolderId, Vec<Image>> = HashMap::new();
        for doc in &image_docs {
            let image = Image::from_document(doc)?;
            by_folder
                .entry(image.folder_id.clone())
                .or_default()
                .push(image);
        }

        folder_docs
            .iter()
            .map(|doc| {
                let mut folder = Folder::from_document(doc)?;
                folder.images = by_folder.remove(&folder.id).unwrap_or_default();
                Ok(folder)
            })
            .collect()
    }

    /// Fetches one folder with its images.
    pub async fn get_folder(&self, id: &FolderId) -> AppResult<Folder> {
        let doc = self.folder_document(id).await?;
        let mut folder = Folder::from_document(&doc)?;
        folder.images = self
            .images_of(id)
            .await?
            .iter()
            .map(Image::from_document)
            .collect::<AppResult<_>>()?;
        Ok(folder)
    }

    /// Creates an empty folder.
    pub async fn create_folder(&self, name: &str) -> AppResult<Folder> {
        let input = CreateFolder::new(name)?;
        let doc = self
            .documents
            .create_document(
                &self.ids.folders,
                input.into_data(),
                &Permission::full_access(Role::Any),
            )
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create folder"))?;
        let folder = Folder::from_document(&doc)?;
        info!(folder_id = %folder.id, name = %folder.name, "Created folder");
        Ok(folder)
    }

    /// Applies a partial update. Last writer wins.
    pub async fn update_folder(&self, id: &FolderId, patch: UpdateFolder) -> AppResult<Folder> {
        if patch.is_empty() {
            return self.get_folder(id).await;
        }
        let doc = self
            .documents
            .update_document(&self.ids.folders, id.as_str(), patch.into_patch()?)
            .await
            .inspect_err(|e| error!(folder_id = %id, error = %e, "Failed to update folder"))?;
        let mut folder = Folder::from_document(&doc)?;
        folder.images = self
            .images_of(id)
            .await?
            .iter()
            .map(Image::from_document)
            .collect::<AppResult<_>>()?;
        info!(folder_id = %id, name = %folder.name, "Updated folder");
        Ok(folder)
    }

    /// Deletes a folder after its images and their storage objects.
    ///
    /// Storage failures are queued in the [`CleanupQueue`] and do not stop
    /// the cascade. A failed document delete stops it; re-issuing the call
    /// continues where it stopped because already-deleted documents count
    /// as done.
    pub async fn delete_folder(&self, id: &FolderId) -> AppResult<()> {
        self.folder_document(id).await?;

        let mut removed = 0usize;
        loop {
            let batch = self.images_of(id).await?;
            let full_batch = !batch.is_empty() && batch.len() >= self.image_limit as usize;
            for doc in &batch {
                let image = Image::from_document(doc)?;
                self.remove_image(&image).await?;
                removed += 1;
            }
            if !full_batch {
                break;
            }
        }

        self.delete_document(&self.ids.folders, id.as_str()).await?;
        info!(folder_id = %id, images = removed, "Deleted folder");
        Ok(())
    }

    /// Uploads files one at a time, stopping at the first failure.
    ///
    /// Fails outright only when the folder does not exist; per-file errors
    /// are reported in [`UploadReport::failure`].
    pub async fn upload_images(
        &self,
        folder_id: &FolderId,
        files: Vec<UploadFile>,
    ) -> AppResult<UploadReport> {
        self.folder_document(folder_id).await?;

        let total = files.len();
        let mut report = UploadReport::default();
        for file in files {
            let file_name = file.file_name.clone();
            match self.upload_one(folder_id, file).await {
                Ok(image) => report.uploaded.push(image),
                Err(e) => {
                    error!(
                        folder_id = %folder_id,
                        file = %file_name,
                        uploaded = report.uploaded.len(),
                        error = %e,
                        "Upload failed; skipping remaining files"
                    );
                    report.failure = Some(UploadFailure {
                        file_name,
                        error: e,
                    });
                    break;
                }
            }
        }

        info!(
            folder_id = %folder_id,
            uploaded = report.uploaded.len(),
            total,
            "Upload batch finished"
        );
        Ok(report)
    }

    async fn upload_one(&self, folder_id: &FolderId, file: UploadFile) -> AppResult<Image> {
        let mime_type = resolve_mime(file.content_type.as_deref(), &file.file_name);
        let object = self
            .storage
            .put_object(ObjectUpload {
                file_name: file.file_name,
                content_type: Some(mime_type),
                data: file.data,
                permissions: vec![Permission::read(Role::Any)],
            })
            .await?;

        let url = self.storage.view_url(&object.key);
        let input = CreateImage::uploaded(folder_id.clone(), url, object.key.clone());
        let doc = match self
            .documents
            .create_document(
                &self.ids.images,
                input.into_data(),
                &Permission::full_access(Role::Any),
            )
            .await
        {
            Ok(doc) => doc,
            Err(e) => {
                warn!(key = %object.key, "Image document not created; removing uploaded object");
                self.cleanup.remove_object(&object.key, None).await;
                return Err(e);
            }
        };

        let image = Image::from_document(&doc)?;
        debug!(image_id = %image.id, key = %object.key, bytes = object.size_bytes, "Uploaded image");
        Ok(image)
    }

    /// Adds an image that points at an external URL.
    ///
    /// `position` is accepted for callers that track one but is not
    /// stored; images are always ordered by creation time.
    pub async fn add_image_url(
        &self,
        folder_id: &FolderId,
        url: &str,
        position: u32,
    ) -> AppResult<Image> {
        let input = CreateImage::external(folder_id.clone(), url)?;
        self.folder_document(folder_id).await?;
        debug!(folder_id = %folder_id, position, "Ignoring image position");

        let doc = self
            .documents
            .create_document(
                &self.ids.images,
                input.into_data(),
                &Permission::full_access(Role::Any),
            )
            .await
            .inspect_err(|e| error!(folder_id = %folder_id, error = %e, "Failed to add image"))?;
        let image = Image::from_document(&doc)?;
        info!(image_id = %image.id, folder_id = %folder_id, "Added image by URL");
        Ok(image)
    }

    /// Deletes one image and its storage object.
    pub async fn delete_image(&self, id: &ImageId) -> AppResult<()> {
        let doc = self
            .documents
            .get_document(&self.ids.images, id.as_str())
            .await?;
        let image = Image::from_document(&doc)?;
        self.remove_image(&image).await?;
        info!(image_id = %id, folder_id = %image.folder_id, "Deleted image");
        Ok(())
    }

    async fn remove_image(&self, image: &Image) -> AppResult<()> {
        if let Some(key) = &image.storage_key {
            self.cleanup.remove_object(key, Some(&image.id)).await;
        }
        self.delete_document(&self.ids.images, image.id.as_str())
            .await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        match self.documents.delete_document(collection, id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(collection, id, "Document already deleted");
                Ok(())
            }
            Err(e) => {
                error!(collection, id, error = %e, "Failed to delete document");
                Err(e)
            }
        }
    }

    async fn folder_document(&self, id: &FolderId) -> AppResult<Document> {
        self.documents
            .get_document(&self.ids.folders, id.as_str())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    AppError::not_found(format!("Folder '{id}' not found"))
                } else {
                    e
                }
            })
    }

    async fn images_of(&self, id: &FolderId) -> AppResult<Vec<Document>> {
        let query = DocumentQuery::new()
            .filter(FilterField::eq("folder_id", id.as_str()))
            .sort(SortField::created_at(SortDirection::Asc))
            .limit(self.image_limit);
        self.documents.list_documents(&self.ids.images, &query).await
    }
}
