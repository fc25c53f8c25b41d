use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use neofs_config::{Settings, StorageBackend};

/// Command-line arguments for `morph-replay`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "morph-replay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replays NeoFS morph governance invocations from a scenario file",
    long_about = "Deploys the netmap and alphabet contracts into a fresh store, replays every \
                  [[step]] of a TOML scenario and prints one JSON report per step."
)]
pub struct ReplayArgs {
    /// Scenario file to replay
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Settings file
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "MORPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ballot lifetime in blocks
    #[arg(long = "block-diff", value_name = "BLOCKS")]
    pub block_diff: Option<u64>,

    /// Storage backend
    #[arg(long = "backend", value_enum)]
    pub backend: Option<Backend>,

    /// Database directory for on-disk backends
    #[arg(long = "db-path", value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Emit log lines as JSON
    #[arg(long = "json-logs")]
    pub json_logs: bool,

    /// Pretty-print step reports
    #[arg(long = "pretty")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Memory,
    Sled,
}

impl From<Backend> for StorageBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Memory => StorageBackend::Memory,
            Backend::Sled => StorageBackend::Sled,
        }
    }
}

impl ReplayArgs {
    /// Settings from the config file, or defaults, with flag overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(block_diff) = self.block_diff {
            settings.governance.block_diff = block_diff;
        }
        if let Some(backend) = self.backend {
            settings.storage.backend = backend.into();
        }
        if let Some(path) = &self.db_path {
            settings.storage.path = Some(path.clone());
        }
        if self.json_logs {
            settings.logging.json = true;
        }
        settings.validate()?;
        Ok(settings)
    }
}
