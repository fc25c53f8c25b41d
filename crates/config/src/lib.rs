//! NeoFS morph configuration.
//!
//! Settings are plain serde structs with per-field defaults, so a TOML file
//! only needs to name the values it overrides:
//!
//! ```rust
//! use neofs_config::Settings;
//!
//! let settings = Settings::from_toml_str("[governance]\nblock_diff = 40\n").unwrap();
//! assert_eq!(settings.governance.block_diff, 40);
//! assert_eq!(settings.governance.contract_version, 1);
//! ```

mod error;
mod governance;
mod storage;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::{ConfigError, ConfigResult};
pub use governance::{GovernanceSettings, LoggingSettings, CONTRACT_VERSION, DEFAULT_BLOCK_DIFF};
pub use storage::{StorageBackend, StorageSettings};

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Ballot and contract parameters.
    #[serde(default)]
    pub governance: GovernanceSettings,

    /// Backend selection.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parses settings from TOML text and validates them.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        self.governance.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}
