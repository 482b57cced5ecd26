//! Backend selection and identifiers.

use serde::{Deserialize, Serialize};

/// Which providers back the document store and the object storage, and
/// the identifiers of the database, collections, and bucket they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Document store provider: `"appwrite"`, `"postgres"`, or `"memory"`.
    #[serde(default = "default_provider")]
    pub documents: String,
    /// Object storage provider: `"appwrite"`, `"local"`, or `"memory"`.
    #[serde(default = "default_provider")]
    pub storage: String,
    /// Hosted service API endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Hosted service project identifier.
    #[serde(default)]
    pub project_id: String,
    /// Hosted service API key. Required for provisioning and writes.
    #[serde(default)]
    pub api_key: String,
    /// Database identifier.
    #[serde(default = "default_database_id")]
    pub database_id: String,
    /// Folder collection identifier.
    #[serde(default = "default_folders_collection")]
    pub folders_collection: String,
    /// Image collection identifier.
    #[serde(default = "default_images_collection")]
    pub images_collection: String,
    /// Image bucket identifier.
    #[serde(default = "default_bucket_id")]
    pub bucket_id: String,
    /// Timeout for a single backend request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            documents: default_provider(),
            storage: default_provider(),
            endpoint: default_endpoint(),
            project_id: String::new(),
            api_key: String::new(),
            database_id: default_database_id(),
            folders_collection: default_folders_collection(),
            images_collection: default_images_collection(),
            bucket_id: default_bucket_id(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_provider() -> String {
    "appwrite".to_string()
}

fn default_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_database_id() -> String {
    "portfolio_db".to_string()
}

fn default_folders_collection() -> String {
    "folders".to_string()
}

fn default_images_collection() -> String {
    "images".to_string()
}

fn default_bucket_id() -> String {
    "project-images".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
