//! Shared fixtures for API route tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, Response, header};
use serde_json::Value;
use tower::ServiceExt;

use folio_api::{AppState, build_app};
use folio_auth::PasswordHasher;
use folio_core::config::AppConfig;
use folio_database::MemoryDocumentStore;
use folio_service::backend::BackendIds;
use folio_service::{Backend, ServiceContext};
use folio_storage::MemoryObjectStorage;

pub const ADMIN_PASSWORD: &str = "copper-lantern-orbit-47";
pub const BOUNDARY: &str = "folio-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub ctx: ServiceContext,
    pub documents: MemoryDocumentStore,
    pub storage: MemoryObjectStorage,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "api-test-secret".into();
    config.auth.admin_password_hash = PasswordHasher::new()
        .hash_password(ADMIN_PASSWORD)
        .unwrap();
    config.gallery.cleanup_interval_seconds = 0;
    config
}

pub fn setup() -> TestApp {
    let ids = BackendIds::default();
    let documents =
        MemoryDocumentStore::with_collections([ids.folders_schema(), ids.images_schema()]);
    let storage = MemoryObjectStorage::with_policy("http://localhost:8080", ids.bucket_policy());
    let backend = Backend::memory_with(documents.clone(), storage.clone());
    let ctx = ServiceContext::new(test_config(), backend);
    TestApp {
        app: build_app(AppState::new(&ctx)),
        ctx,
        documents,
        storage,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (u16, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        (status, json_body(response).await)
    }

    pub async fn get(&self, uri: &str) -> (u16, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (u16, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn login(&self) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/auth/login",
                None,
                serde_json::json!({"password": ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(status, 200, "login failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn create_folder(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/folders",
                Some(token),
                serde_json::json!({"name": name}),
            )
            .await;
        assert_eq!(status, 201, "create failed: {body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// A multipart body with one `files` part per `(name, content type, bytes)`.
pub fn multipart(files: &[(&str, &str, &[u8])]) -> Body {
    let mut body = Vec::new();
    for (name, content_type, data) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

pub fn upload_request(folder_id: &str, token: &str, body: Body) -> Request<Body> {
    Request::post(format!("/api/folders/{folder_id}/images"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(body)
        .unwrap()
}

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
