//! Governance settings shared by every voted contract.
//!
//! These parameters must be identical on all inner ring members: a ballot
//! that one member considers fresh and another considers expired would split
//! the tally.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Number of blocks a ballot stays alive after its last vote.
pub const DEFAULT_BLOCK_DIFF: u64 = 20;

/// Version reported by the contracts' `version` method.
pub const CONTRACT_VERSION: u32 = 1;

/// Ballot and contract parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSettings {
    /// Retention window of block-scoped ballots, in blocks.
    #[serde(default = "default_block_diff")]
    pub block_diff: u64,

    /// Contract version number.
    #[serde(default = "default_contract_version")]
    pub contract_version: u32,
}

fn default_block_diff() -> u64 {
    DEFAULT_BLOCK_DIFF
}

fn default_contract_version() -> u32 {
    CONTRACT_VERSION
}

impl Default for GovernanceSettings {
    fn default() -> Self {
        Self {
            block_diff: DEFAULT_BLOCK_DIFF,
            contract_version: CONTRACT_VERSION,
        }
    }
}

impl GovernanceSettings {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if self.block_diff == 0 {
            return Err(ConfigError::invalid(
                "governance.block_diff",
                "ballots must survive at least one block",
            ));
        }
        Ok(())
    }
}

/// Log output settings for binaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_block_diff_is_invalid() {
        let settings = GovernanceSettings {
            block_diff: 0,
            ..GovernanceSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
