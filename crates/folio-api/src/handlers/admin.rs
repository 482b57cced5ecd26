//! Admin maintenance handlers.

use axum::Json;
use axum::extract::State;

use folio_service::CleanupReport;

use crate::dto::response::{ApiResponse, CleanupStatusResponse};
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/admin/cleanup
pub async fn cleanup_status(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<ApiResponse<CleanupStatusResponse>> {
    Json(ApiResponse::ok(CleanupStatusResponse {
        pending: state.cleanup.pending(),
    }))
}

/// POST /api/admin/cleanup/retry
pub async fn retry_cleanup(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<ApiResponse<CleanupReport>> {
    Json(ApiResponse::ok(state.cleanup.retry_pending().await))
}
