//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use folio_core::error::{AppError, ErrorKind};
use folio_core::types::ApiErrorResponse;

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    /// The underlying error.
    pub error: AppError,
    /// Replaces the code derived from the error kind.
    code: Option<&'static str>,
}

impl ApiError {
    /// Respond with a specific machine-readable code.
    pub fn with_code(error: AppError, code: &'static str) -> Self {
        Self {
            error,
            code: Some(code),
        }
    }

    /// Status and default code for an error kind.
    pub fn status_of(kind: ErrorKind) -> (StatusCode, &'static str) {
        match kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::Transport => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR"),
            ErrorKind::Configuration => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED"),
            ErrorKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Storage
            | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self { error, code: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, default_code) = Self::status_of(self.error.kind);
        if status.is_server_error() {
            tracing::error!(kind = %self.error.kind, error = %self.error.message, "Request failed");
        }

        let body = ApiErrorResponse {
            error: self.code.unwrap_or(default_code).to_string(),
            message: self.error.message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::status_of(ErrorKind::NotFound).0, StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::status_of(ErrorKind::Authentication).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::status_of(ErrorKind::Transport).0, StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::status_of(ErrorKind::Storage).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_override() {
        let response =
            ApiError::with_code(AppError::authentication("nope"), "WRONG_PASSWORD").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
