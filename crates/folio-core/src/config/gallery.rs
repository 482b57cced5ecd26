//! Gallery listing and maintenance configuration.

use serde::{Deserialize, Serialize};

/// Listing limits, the shared listing cache, and the orphan cleanup cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Maximum folders returned by a listing.
    #[serde(default = "default_folder_limit")]
    pub folder_limit: u32,
    /// Maximum images fetched per listing, across all folders.
    #[serde(default = "default_image_limit")]
    pub image_limit: u32,
    /// Seconds a cached listing stays fresh when no mutation happens.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Seconds between orphan cleanup passes. Zero disables the task.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            folder_limit: default_folder_limit(),
            image_limit: default_image_limit(),
            cache_ttl_seconds: default_cache_ttl(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

fn default_folder_limit() -> u32 {
    100
}

fn default_image_limit() -> u32 {
    500
}

fn default_cache_ttl() -> u64 {
    30
}

fn default_cleanup_interval() -> u64 {
    300
}
