//! Route-level tests over memory providers.

mod helpers;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, header};
use serde_json::json;
use tower::ServiceExt;

use folio_core::error::ErrorKind;
use folio_storage::StorageOp;

use helpers::{PNG, multipart, setup, upload_request};

#[tokio::test]
async fn test_health_reports_backends() {
    let t = setup();
    let (status, body) = t.get("/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["backend"]["documents_backend"], "memory");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let t = setup();
    let (status, body) = t
        .json(Method::POST, "/api/auth/login", None, json!({"password": "nope"}))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "WRONG_PASSWORD");
}

#[tokio::test]
async fn test_login_me_logout() {
    let t = setup();
    let token = t.login().await;

    let request = Request::get("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = t.send(request).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["subject"], "admin");

    let (status, _) = t
        .json(Method::POST, "/api/auth/logout", Some(&token), json!({}))
        .await;
    assert_eq!(status, 200);

    let (status, _) = t
        .json(Method::POST, "/api/folders", Some(&token), json!({"name": "Late"}))
        .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_writes_require_token() {
    let t = setup();
    let (status, body) = t
        .json(Method::POST, "/api/folders", None, json!({"name": "Alpha"}))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = t
        .json(Method::POST, "/api/folders", Some("garbage"), json!({"name": "Alpha"}))
        .await;
    assert_eq!(status, 401);
    assert_eq!(t.documents.count("folders"), 0);
}

#[tokio::test]
async fn test_folder_crud() {
    let t = setup();
    let token = t.login().await;
    let id = t.create_folder(&token, "Alpha").await;
    t.create_folder(&token, "Beta").await;

    let (status, body) = t.get("/api/folders").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);

    let (_, body) = t.get("/api/folders?order=desc").await;
    assert_eq!(body["data"][0]["name"], "Beta");

    let (_, body) = t.get("/api/folders?q=ALP").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = t
        .json(
            Method::PATCH,
            &format!("/api/folders/{id}"),
            Some(&token),
            json!({"name": "Renamed"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Renamed");

    let (status, body) = t.get(&format!("/api/folders/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Renamed");

    let (status, _) = t
        .json(Method::DELETE, &format!("/api/folders/{id}"), Some(&token), json!({}))
        .await;
    assert_eq!(status, 200);

    let (status, body) = t.get(&format!("/api/folders/{id}")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_folder_validation() {
    let t = setup();
    let token = t.login().await;
    let (status, body) = t
        .json(Method::POST, "/api/folders", Some(&token), json!({"name": ""}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = t.get("/api/folders?order=sideways").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_upload_and_serve_file() {
    let t = setup();
    let token = t.login().await;
    let folder = t.create_folder(&token, "Shots").await;

    let body = multipart(&[("a.png", "image/png", PNG), ("b.png", "image/png", PNG)]);
    let (status, body) = t.send(upload_request(&folder, &token, body)).await;
    assert_eq!(status, 201);
    let uploaded = body["data"]["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 2);

    let key = uploaded[0]["storage_key"].as_str().unwrap().to_string();
    let url = uploaded[0]["url"].as_str().unwrap();
    assert_eq!(url, format!("http://localhost:8080/api/files/{key}"));

    let response = t
        .app
        .clone()
        .oneshot(
            Request::get(format!("/api/files/{key}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], PNG);
}

#[tokio::test]
async fn test_partial_upload_is_multi_status() {
    let t = setup();
    let token = t.login().await;
    let folder = t.create_folder(&token, "Mixed").await;

    let body = multipart(&[
        ("a.png", "image/png", PNG),
        ("notes.txt", "text/plain", b"hello"),
        ("c.png", "image/png", PNG),
    ]);
    let (status, body) = t.send(upload_request(&folder, &token, body)).await;
    assert_eq!(status, 207);
    assert_eq!(body["data"]["uploaded"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["failure"]["file_name"], "notes.txt");
    assert_eq!(t.documents.count("images"), 1);
}

#[tokio::test]
async fn test_failed_upload_reports_error() {
    let t = setup();
    let token = t.login().await;
    let folder = t.create_folder(&token, "Broken").await;
    t.storage.fail_next(StorageOp::Put, "a.png", ErrorKind::Transport);

    let body = multipart(&[("a.png", "image/png", PNG)]);
    let (status, body) = t.send(upload_request(&folder, &token, body)).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "BACKEND_ERROR");
}

#[tokio::test]
async fn test_empty_upload_rejected() {
    let t = setup();
    let token = t.login().await;
    let folder = t.create_folder(&token, "Empty").await;
    let (status, _) = t
        .send(upload_request(&folder, &token, multipart(&[])))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_add_url_and_delete_image() {
    let t = setup();
    let token = t.login().await;
    let folder = t.create_folder(&token, "Links").await;

    let (status, body) = t
        .json(
            Method::POST,
            &format!("/api/folders/{folder}/images/url"),
            Some(&token),
            json!({"url": "https://example.com/x.png", "position": 3}),
        )
        .await;
    assert_eq!(status, 201);
    assert!(body["data"]["storage_key"].is_null());
    let image = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = t
        .json(
            Method::POST,
            &format!("/api/folders/{folder}/images/url"),
            Some(&token),
            json!({"url": "not a url"}),
        )
        .await;
    assert_eq!(status, 400);

    let (status, _) = t
        .json(Method::DELETE, &format!("/api/images/{image}"), Some(&token), json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(t.documents.count("images"), 0);

    let (status, _) = t
        .json(Method::DELETE, &format!("/api/images/{image}"), Some(&token), json!({}))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_cleanup_queue_endpoints() {
    let t = setup();
    let token = t.login().await;
    let folder = t.create_folder(&token, "Queue").await;

    let body = multipart(&[("a.png", "image/png", PNG)]);
    let (_, body) = t.send(upload_request(&folder, &token, body)).await;
    let key = body["data"]["uploaded"][0]["storage_key"]
        .as_str()
        .unwrap()
        .to_string();

    t.storage.fail_next(StorageOp::Delete, key.as_str(), ErrorKind::Transport);
    let (status, _) = t
        .json(Method::DELETE, &format!("/api/folders/{folder}"), Some(&token), json!({}))
        .await;
    assert_eq!(status, 200);

    let request = Request::get("/api/admin/cleanup")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = t.send(request).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["pending"].as_array().unwrap().len(), 1);

    let (status, body) = t
        .json(Method::POST, "/api/admin/cleanup/retry", Some(&token), json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["removed"], 1);
    assert_eq!(t.ctx.cleanup.pending_count(), 0);
}

#[tokio::test]
async fn test_assistant_replies() {
    let t = setup();
    let (status, body) = t
        .json(
            Method::POST,
            "/api/assistant",
            None,
            json!({"message": "hello there", "language": "en"}),
        )
        .await;
    assert_eq!(status, 200);
    assert!(!body["data"]["text"].as_str().unwrap().is_empty());

    let (status, _) = t
        .json(Method::POST, "/api/assistant", None, json!({"message": ""}))
        .await;
    assert_eq!(status, 400);
}
