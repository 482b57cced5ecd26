//! Serves objects for providers without their own public URLs.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use folio_core::types::ObjectKey;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/files/{key}
pub async fn get_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    let key: ObjectKey = key.parse()?;
    let object = state.backend.storage.read_object(&key).await?;
    Ok((
        [
            (header::CONTENT_TYPE, object.mime_type),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        object.data,
    )
        .into_response())
}
