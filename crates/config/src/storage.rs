//! Storage backend selection.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Available storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Volatile in-memory store.
    #[default]
    Memory,
    /// Sled database on disk.
    Sled,
}

/// Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Backend kind.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database directory, required for on-disk backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageSettings {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.backend == StorageBackend::Sled && self.path.is_none() {
            return Err(ConfigError::invalid(
                "storage.path",
                "the sled backend needs a database directory",
            ));
        }
        Ok(())
    }
}
