//! Folder handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use folio_core::types::{FolderId, SortDirection};
use folio_entity::{Folder, UpdateFolder};
use folio_service::filter_by_name;

use crate::dto::request::{CreateFolderRequest, ListFoldersQuery, UpdateFolderRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AdminUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/folders?order=asc|desc&q=
pub async fn list_folders(
    State(state): State<AppState>,
    Query(params): Query<ListFoldersQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let direction = match params.order.as_deref() {
        Some(order) => order.parse::<SortDirection>()?,
        None => SortDirection::Asc,
    };
    let folders = state.store.folders(direction).await?;
    let query = params.q.unwrap_or_default();
    Ok(Json(ApiResponse::ok(filter_by_name(&folders, &query))))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let id: FolderId = id.parse()?;
    Ok(Json(ApiResponse::ok(state.store.get_folder(&id).await?)))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Folder>>)> {
    let folder = state.store.create_folder(&req.name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// PATCH /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateFolderRequest>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let id: FolderId = id.parse()?;
    let folder = state
        .store
        .update_folder(&id, UpdateFolder { name: req.name })
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let id: FolderId = id.parse()?;
    state.store.delete_folder(&id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Folder deleted"))))
}
