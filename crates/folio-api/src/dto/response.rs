//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_service::{BackendHealth, PendingCleanup};

pub use folio_core::types::ApiResponse;

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Provider reachability.
    pub backend: BackendHealth,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Current token info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// Token subject.
    pub subject: String,
    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Pending cleanup entries.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupStatusResponse {
    /// Entries, oldest first.
    pub pending: Vec<PendingCleanup>,
}
