//! HTTP client for the Appwrite REST API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use folio_core::config::backend::BackendConfig;
use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    error_type: String,
}

/// Authenticated client for one project.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
}

impl AppwriteClient {
    /// Build a client from the `[backend]` section.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        if config.project_id.trim().is_empty() {
            return Err(AppError::configuration(
                "backend.project_id is required for the appwrite provider",
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Appwrite-Project",
            HeaderValue::from_str(&config.project_id).map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid project id", e)
            })?,
        );
        if !config.api_key.is_empty() {
            let mut key = HeaderValue::from_str(&config.api_key).map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid API key", e)
            })?;
            key.set_sensitive(true);
            headers.insert("X-Appwrite-Key", key);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
        })
    }

    /// API base URL, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Project identifier.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> AppResult<Url> {
        Url::parse(&format!("{}{}", self.endpoint, path)).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid backend URL for '{path}'"),
                e,
            )
        })
    }

    /// Start a request against an absolute URL.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Send a request and decode a JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(ErrorKind::Transport, "Failed to decode backend response", e)
        })
    }

    /// Send a request and discard the body.
    pub async fn send_empty(&self, request: RequestBuilder) -> AppResult<()> {
        self.send(request).await.map(|_| ())
    }

    /// Send a request, mapping non-success statuses to [`AppError`].
    pub async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::Transport, "Backend request failed", e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Backend response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &body))
    }
}

/// Map an error response to an [`AppError`]: 404 is `NotFound`, 409 is
/// `Conflict`, 400 is `Validation`, everything else is `Transport`.
pub(crate) fn error_from_response(status: StatusCode, body: &str) -> AppError {
    let parsed: Option<ApiError> = serde_json::from_str(body).ok();
    let message = match &parsed {
        Some(err) if !err.message.is_empty() => {
            format!("{} ({})", err.message, err.error_type)
        }
        _ => format!("Backend returned HTTP {status}"),
    };

    let kind = match status {
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        StatusCode::BAD_REQUEST => ErrorKind::Validation,
        _ => ErrorKind::Transport,
    };
    AppError::new(kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let body = r#"{"message":"Document not found","code":404,"type":"document_not_found"}"#;
        let err = error_from_response(StatusCode::NOT_FOUND, body);
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("Document not found"));

        assert_eq!(
            error_from_response(StatusCode::CONFLICT, "").kind,
            ErrorKind::Conflict
        );
        assert_eq!(
            error_from_response(StatusCode::BAD_REQUEST, "{}").kind,
            ErrorKind::Validation
        );
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::BAD_GATEWAY,
        ] {
            assert_eq!(error_from_response(status, "").kind, ErrorKind::Transport);
        }
    }

    #[test]
    fn test_requires_project() {
        let config = BackendConfig::default();
        assert_eq!(
            AppwriteClient::new(&config).unwrap_err().kind,
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_url_joins_endpoint() {
        let config = BackendConfig {
            project_id: "p1".into(),
            endpoint: "https://cloud.appwrite.io/v1/".into(),
            ..BackendConfig::default()
        };
        let client = AppwriteClient::new(&config).unwrap();
        assert_eq!(
            client.url("/databases/db").unwrap().as_str(),
            "https://cloud.appwrite.io/v1/databases/db"
        );
    }
}
