//! Persistence behaviour of the gallery service over memory providers.

mod helpers;

use folio_core::error::ErrorKind;
use folio_core::types::{FolderId, SortDirection};
use folio_database::DocumentOp;
use folio_entity::UpdateFolder;
use folio_storage::StorageOp;

use helpers::{png, setup};

#[tokio::test]
async fn test_created_folder_is_listed_empty() {
    let t = setup();
    let service = t.ctx.store.service();

    let created = service.create_folder("  Alpha ").await.unwrap();
    assert_eq!(created.name, "Alpha");

    let folders = service.list_folders(SortDirection::Asc).await.unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].id, created.id);
    assert!(folders[0].images.is_empty());
}

#[tokio::test]
async fn test_empty_gallery_lists_nothing() {
    let t = setup();
    let folders = t.ctx.store.service().list_folders(SortDirection::Desc).await.unwrap();
    assert!(folders.is_empty());
}

#[tokio::test]
async fn test_blank_folder_name_rejected() {
    let t = setup();
    let err = t.ctx.store.service().create_folder("   ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(t.documents.count("folders"), 0);
}

#[tokio::test]
async fn test_list_order_and_grouping() {
    let t = setup();
    let service = t.ctx.store.service();
    let first = service.create_folder("First").await.unwrap();
    let second = service.create_folder("Second").await.unwrap();
    service.add_image_url(&second.id, "https://x/1.png", 0).await.unwrap();
    service.add_image_url(&first.id, "https://x/2.png", 0).await.unwrap();
    service.add_image_url(&second.id, "https://x/3.png", 5).await.unwrap();

    let asc = service.list_folders(SortDirection::Asc).await.unwrap();
    assert_eq!(asc[0].name, "First");
    let urls: Vec<&str> = asc[1].images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, vec!["https://x/1.png", "https://x/3.png"]);

    let desc = service.list_folders(SortDirection::Desc).await.unwrap();
    assert_eq!(desc[0].name, "Second");
}

#[tokio::test]
async fn test_rename_folder() {
    let t = setup();
    let service = t.ctx.store.service();
    let folder = service.create_folder("Draft").await.unwrap();

    let renamed = service
        .update_folder(&folder.id, UpdateFolder::rename("Final"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Final");
    assert_eq!(renamed.created_at, folder.created_at);

    let missing = service
        .update_folder(&FolderId::new("nope"), UpdateFolder::rename("x"))
        .await
        .unwrap_err();
    assert_eq!(missing.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_add_image_url_has_no_storage_key() {
    let t = setup();
    let service = t.ctx.store.service();
    let folder = service.create_folder("Links").await.unwrap();

    service
        .add_image_url(&folder.id, "https://x/y.png", 3)
        .await
        .unwrap();

    let folders = service.list_folders(SortDirection::Asc).await.unwrap();
    assert_eq!(folders[0].images.len(), 1);
    assert_eq!(folders[0].images[0].url, "https://x/y.png");
    assert_eq!(folders[0].images[0].storage_key, None);
    assert!(t.storage.is_empty());
}

#[tokio::test]
async fn test_images_require_existing_folder() {
    let t = setup();
    let service = t.ctx.store.service();
    let ghost = FolderId::new("ghost");

    let err = service.add_image_url(&ghost, "https://x/y.png", 0).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = service.upload_images(&ghost, vec![png("a.png")]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(t.documents.count("images"), 0);
    assert!(t.storage.is_empty());
}

#[tokio::test]
async fn test_upload_records_view_url_and_key() {
    let t = setup();
    let service = t.ctx.store.service();
    let folder = service.create_folder("Shots").await.unwrap();

    let report = service
        .upload_images(&folder.id, vec![png("a.png"), png("b.png")])
        .await
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.uploaded.len(), 2);

    let image = &report.uploaded[0];
    let key = image.storage_key.clone().unwrap();
    assert!(t.storage.contains(&key));
    assert_eq!(image.url, format!("http://localhost:8080/api/files/{key}"));
}

#[tokio::test]
async fn test_upload_stops_at_first_failure() {
    let t = setup();
    let service = t.ctx.store.service();
    let folder = service.create_folder("Batch").await.unwrap();
    t.storage.fail_next(StorageOp::Put, "f2.png", ErrorKind::Transport);

    let report = service
        .upload_images(&folder.id, vec![png("f1.png"), png("f2.png"), png("f3.png")])
        .await
        .unwrap();

    assert_eq!(report.uploaded.len(), 1);
    let failure = report.failure.unwrap();
    assert_eq!(failure.file_name, "f2.png");
    assert_eq!(failure.error.kind, ErrorKind::Transport);
    assert_eq!(t.storage.calls().await, vec!["put f1.png", "put f2.png"]);

    assert_eq!(t.documents.count("images"), 1);
    let folders = service.list_folders(SortDirection::Asc).await.unwrap();
    assert_eq!(folders[0].images[0].id, report.uploaded[0].id);
}

#[tokio::test]
async fn test_failed_document_create_removes_uploaded_object() {
    let t = setup();
    let service = t.ctx.store.service();
    let folder = service.create_folder("Orphans").await.unwrap();
    t.documents.fail_next(DocumentOp::Create, "images", ErrorKind::Transport);

    let report = service.upload_images(&folder.id, vec![png("a.png")]).await.unwrap();
    assert!(report.uploaded.is_empty());
    assert!(report.failure.is_some());
    assert!(t.storage.is_empty());
    assert_eq!(t.ctx.cleanup.pending_count(), 0);
}

#[tokio::test]
async fn test_cascade_delete_order() {
    let t = setup();
    let service = t.ctx.store.service();
    let folder = service.create_folder("Doomed").await.unwrap();
    let report = service
        .upload_images(&folder.id, vec![png("a.png"), png("b.png")])
        .await
        .unwrap();
    let keep = service.create_folder("Keep").await.unwrap();
    service.add_image_url(&keep.id, "https://x/k.png", 0).await.unwrap();

    let doc_calls_before = t.documents.calls().await.len();
    let storage_calls_before = t.storage.calls().await.len();

    service.delete_folder(&folder.id).await.unwrap();

    let doc_deletes: Vec<String> = t.documents.calls().await[doc_calls_before..]
        .iter()
        .filter(|c| c.starts_with("delete "))
        .cloned()
        .collect();
    let expected: Vec<String> = report
        .uploaded
        .iter()
        .map(|i| format!("delete images/{}", i.id))
        .chain([format!("delete folders/{}", folder.id)])
        .collect();
    assert_eq!(doc_deletes, expected);

    let storage_deletes: Vec<String> = t.storage.calls().await[storage_calls_before..].to_vec();
    let expected: Vec<String> = report
        .uploaded
        .iter()
        .map(|i| format!("delete {}", i.storage_key.clone().unwrap()))
        .collect();
    assert_eq!(storage_deletes, expected);

    assert!(t.storage.is_empty());
    assert_eq!(t.documents.count("images"), 1);
    let folders = service.list_folders(SortDirection::Asc).await.unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].id, keep.id);
}

#[tokio::test]
async fn test_storage_failure_does_not_block_document_delete() {
    let t = setup();
    let service = t.ctx.store.service();
    let folder = service.create_folder("Flaky").await.unwrap();
    let report = service.upload_images(&folder.id, vec![png("a.png")]).await.unwrap();
    let image = &report.uploaded[0];
    let key = image.storage_key.clone().unwrap();
    t.storage.fail_next(StorageOp::Delete, key.as_str(), ErrorKind::Transport);

    service.delete_image(&image.id).await.unwrap();

    assert_eq!(t.documents.count("images"), 0);
    assert!(t.storage.contains(&key));
    let pending = t.ctx.cleanup.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].key, key);
    assert_eq!(pending[0].image_id.as_ref(), Some(&image.id));

    let retried = t.ctx.cleanup.retry_pending().await;
    assert_eq!(retried.removed, 1);
    assert!(!t.storage.contains(&key));
}

#[tokio::test]
async fn test_interrupted_cascade_can_be_reissued() {
    let t = setup();
    let service = t.ctx.store.service();
    let folder = service.create_folder("Half").await.unwrap();
    let report = service
        .upload_images(&folder.id, vec![png("a.png"), png("b.png")])
        .await
        .unwrap();
    let second = report.uploaded[1].id.clone();
    t.documents.fail_next(DocumentOp::Delete, second.as_str(), ErrorKind::Transport);

    let err = service.delete_folder(&folder.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(t.documents.count("folders"), 1);
    assert_eq!(t.documents.count("images"), 1);

    service.delete_folder(&folder.id).await.unwrap();
    assert_eq!(t.documents.count("folders"), 0);
    assert_eq!(t.documents.count("images"), 0);
    assert!(t.storage.is_empty());
}

#[tokio::test]
async fn test_delete_unknown_ids() {
    let t = setup();
    let service = t.ctx.store.service();
    let err = service.delete_folder(&FolderId::new("nope")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = service
        .delete_image(&folio_core::types::ImageId::new("nope"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
