//! Image handlers: upload, add by URL, delete.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;

use folio_core::error::AppError;
use folio_core::types::{FolderId, ImageId};
use folio_entity::{Image, UploadFile};
use folio_service::UploadReport;

use crate::dto::request::AddImageUrlRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AdminUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/folders/{id}/images (multipart, one `files` field per file)
///
/// Responds 201 when every file was stored, 207 when the batch stopped
/// partway, and with the failing file's error when nothing was stored.
pub async fn upload_images(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<UploadReport>>)> {
    let folder_id: FolderId = id.parse()?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if !matches!(field.name(), Some("files" | "file")) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;

        let mut file = UploadFile::new(file_name, data);
        if let Some(content_type) = content_type {
            file = file.with_content_type(content_type);
        }
        files.push(file);
    }
    if files.is_empty() {
        return Err(AppError::validation("No files in request").into());
    }

    let report = state.store.upload_images(&folder_id, files).await?;
    let status = match &report.failure {
        None => StatusCode::CREATED,
        Some(_) if !report.uploaded.is_empty() => StatusCode::MULTI_STATUS,
        Some(failure) => return Err(ApiError::from(failure.error.clone())),
    };
    Ok((status, Json(ApiResponse::ok(report))))
}

/// POST /api/folders/{id}/images/url
pub async fn add_image_url(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddImageUrlRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Image>>)> {
    let folder_id: FolderId = id.parse()?;
    let image = state
        .store
        .add_image_url(&folder_id, &req.url, req.position)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(image))))
}

/// DELETE /api/images/{id}
pub async fn delete_image(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: ImageId = id.parse()?;
    state.store.delete_image(&id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Image deleted"))))
}
