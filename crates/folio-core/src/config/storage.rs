//! Local object storage configuration.

use serde::{Deserialize, Serialize};

/// Settings for the filesystem object storage provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that holds one sub-directory per bucket.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
        }
    }
}

fn default_root_path() -> String {
    "data/storage".to_string()
}
