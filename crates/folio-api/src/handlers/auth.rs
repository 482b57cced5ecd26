//! Auth handlers: login, logout, me.

use axum::Json;
use axum::extract::State;

use folio_core::error::ErrorKind;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse, MeResponse, MessageResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AdminUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let issued = state.auth.login(&req.password).map_err(|e| {
        if e.kind == ErrorKind::Authentication {
            ApiError::with_code(e, "WRONG_PASSWORD")
        } else {
            ApiError::from(e)
        }
    })?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.auth.logout(&admin.token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// GET /api/auth/me
pub async fn me(admin: AdminUser) -> Json<ApiResponse<MeResponse>> {
    let claims = admin.claims;
    Json(ApiResponse::ok(MeResponse {
        issued_at: chrono::DateTime::from_timestamp(claims.iat, 0).unwrap_or_default(),
        expires_at: claims.expires_at(),
        subject: claims.sub,
    }))
}
