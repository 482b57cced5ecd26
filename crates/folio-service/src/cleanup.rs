//! Pending storage deletes.
//!
//! Every storage object delete goes through [`CleanupQueue::remove_object`],
//! which records the intent first and only forgets it once the provider
//! confirms. A failed delete never blocks the document delete that follows;
//! it stays queued, is logged, and is retried by the periodic task or on
//! demand.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use folio_core::traits::ObjectStorage;
use folio_core::types::{ImageId, ObjectKey};

/// A storage object that still has to be deleted.
#[derive(Debug, Clone, Serialize)]
pub struct PendingCleanup {
    /// Object key.
    pub key: ObjectKey,
    /// Image document that referenced the object, if one was created.
    pub image_id: Option<ImageId>,
    /// Delete attempts so far.
    pub attempts: u32,
    /// Error from the most recent attempt.
    pub last_error: Option<String>,
    /// When the delete was first requested.
    pub queued_at: DateTime<Utc>,
}

/// Outcome of one retry pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Entries attempted.
    pub attempted: usize,
    /// Entries removed from the queue.
    pub removed: usize,
    /// Entries still pending after the pass.
    pub remaining: usize,
}

/// Intent log for storage deletes.
#[derive(Debug)]
pub struct CleanupQueue {
    storage: Arc<dyn ObjectStorage>,
    pending: DashMap<ObjectKey, PendingCleanup>,
}

impl CleanupQueue {
    /// Create an empty queue over `storage`.
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            storage,
            pending: DashMap::new(),
        }
    }

    /// Delete one object, keeping it queued if the provider fails.
    ///
    /// Returns `true` when the object is gone, including when the provider
    /// reports it was already missing.
    pub async fn remove_object(&self, key: &ObjectKey, image_id: Option<&ImageId>) -> bool {
        self.pending
            .entry(key.clone())
            .or_insert_with(|| PendingCleanup {
                key: key.clone(),
                image_id: image_id.cloned(),
                attempts: 0,
                last_error: None,
                queued_at: Utc::now(),
            });
        self.attempt(key).await
    }

    async fn attempt(&self, key: &ObjectKey) -> bool {
        let result = self.storage.delete_object(key).await;
        match result {
            Ok(()) => {
                self.pending.remove(key);
                debug!(key = %key, "Deleted storage object");
                true
            }
            Err(e) if e.is_not_found() => {
                self.pending.remove(key);
                debug!(key = %key, "Storage object already absent");
                true
            }
            Err(e) => {
                let attempts = match self.pending.get_mut(key) {
                    Some(mut entry) => {
                        entry.attempts += 1;
                        entry.last_error = Some(e.to_string());
                        entry.attempts
                    }
                    None => 1,
                };
                warn!(key = %key, attempts, error = %e, "Storage delete failed; queued for retry");
                false
            }
        }
    }

    /// Retry every pending delete once.
    pub async fn retry_pending(&self) -> CleanupReport {
        let keys: Vec<ObjectKey> = self.pending.iter().map(|e| e.key().clone()).collect();
        let mut report = CleanupReport {
            attempted: keys.len(),
            ..CleanupReport::default()
        };
        for key in &keys {
            if self.attempt(key).await {
                report.removed += 1;
            }
        }
        report.remaining = self.pending.len();
        if report.attempted > 0 {
            info!(
                attempted = report.attempted,
                removed = report.removed,
                remaining = report.remaining,
                "Cleanup pass finished"
            );
        }
        report
    }

    /// Snapshot of pending entries, oldest first.
    pub fn pending(&self) -> Vec<PendingCleanup> {
        let mut entries: Vec<PendingCleanup> =
            self.pending.iter().map(|e| e.value().clone()).collect();
        entries.sort_by(|a, b| a.queued_at.cmp(&b.queued_at).then(a.key.cmp(&b.key)));
        entries
    }

    /// Number of pending entries.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Run [`retry_pending`](Self::retry_pending) every `interval` until the
    /// shutdown flag turns true.
    pub fn spawn(
        self: Arc<Self>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Cleanup task started");
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        self.retry_pending().await;
                    }
                }
            }
            info!(pending = self.pending_count(), "Cleanup task stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use folio_core::error::ErrorKind;
    use folio_core::schema::BucketPolicy;
    use folio_core::traits::ObjectUpload;
    use folio_storage::{MemoryObjectStorage, StorageOp};

    async fn stored(storage: &MemoryObjectStorage) -> ObjectKey {
        storage
            .put_object(ObjectUpload {
                file_name: "a.png".into(),
                content_type: Some("image/png".into()),
                data: Bytes::from_static(b"png"),
                permissions: Vec::new(),
            })
            .await
            .unwrap()
            .key
    }

    fn setup() -> (MemoryObjectStorage, CleanupQueue) {
        let storage = MemoryObjectStorage::with_policy(
            "http://localhost",
            BucketPolicy::project_images("project-images"),
        );
        let queue = CleanupQueue::new(Arc::new(storage.clone()));
        (storage, queue)
    }

    #[tokio::test]
    async fn test_successful_delete_leaves_nothing_pending() {
        let (storage, queue) = setup();
        let key = stored(&storage).await;
        assert!(queue.remove_object(&key, None).await);
        assert_eq!(queue.pending_count(), 0);
        assert!(!storage.contains(&key));
    }

    #[tokio::test]
    async fn test_missing_object_counts_as_deleted() {
        let (_storage, queue) = setup();
        assert!(queue.remove_object(&ObjectKey::new("gone"), None).await);
        assert_eq!(queue.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_queued_then_retried() {
        let (storage, queue) = setup();
        let key = stored(&storage).await;
        let image = ImageId::new("img1");
        storage.fail_next(StorageOp::Delete, key.as_str(), ErrorKind::Transport);

        assert!(!queue.remove_object(&key, Some(&image)).await);
        let pending = queue.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].image_id, Some(image));
        assert_eq!(pending[0].attempts, 1);
        assert!(pending[0].last_error.is_some());

        let report = queue.retry_pending().await;
        assert_eq!(
            report,
            CleanupReport {
                attempted: 1,
                removed: 1,
                remaining: 0
            }
        );
        assert!(!storage.contains(&key));
    }

    #[tokio::test]
    async fn test_spawned_task_stops_on_shutdown() {
        let (_storage, queue) = setup();
        let (tx, rx) = watch::channel(false);
        let handle = Arc::new(queue).spawn(Duration::from_millis(10), rx);
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
