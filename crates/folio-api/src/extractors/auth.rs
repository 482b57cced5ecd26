//! `AdminUser` extractor: pulls the bearer token from the Authorization
//! header and validates it.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use folio_auth::Claims;
use folio_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated admin request.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Validated claims.
    pub claims: Claims,
    /// The raw bearer token, needed for logout.
    pub token: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.auth.authenticate(token).await?;
        Ok(Self {
            claims,
            token: token.to_string(),
        })
    }
}
