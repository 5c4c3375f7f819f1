use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the contact directory
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DirectoryConfig {
    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Storage backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Process-local store, lost on restart
    Memory {
        /// Start from the canonical phonebook entries
        #[serde(default = "default_seeded")]
        seeded: bool,
    },
    /// sled-backed document store
    Document {
        #[serde(default = "default_data_path")]
        data_path: PathBuf,
    },
}

fn default_seeded() -> bool {
    true
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./phonebook-data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Memory {
            seeded: default_seeded(),
        }
    }
}
