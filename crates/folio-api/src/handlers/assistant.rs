//! Chat widget handler.

use axum::Json;
use axum::extract::State;

use folio_service::AssistantReply;

use crate::dto::request::AssistantRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/assistant
pub async fn ask(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AssistantRequest>,
) -> ApiResult<Json<ApiResponse<AssistantReply>>> {
    let reply = state
        .assistant
        .reply(&req.message, req.language.as_deref());
    Ok(Json(ApiResponse::ok(reply)))
}
