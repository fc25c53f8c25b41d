//! Scenario replay for the NeoFS morph governance contracts.
//!
//! The `morph-replay` binary deploys the netmap and alphabet contracts into
//! a fresh store, replays the invocations listed in a TOML scenario and
//! prints each outcome as a JSON line.

pub mod args;
pub mod logging;
pub mod runner;
pub mod scenario;

use anyhow::Result;
use neofs_config::{StorageBackend, StorageSettings};
use neofs_store::{MemoryStore, Store};

pub use args::ReplayArgs;
pub use runner::{ReplayVoting, Runner, StepReport};
pub use scenario::{Operation, Scenario, Step};

/// Opens the backend selected by `settings`.
pub fn open_store(settings: &StorageSettings) -> Result<Box<dyn Store>> {
    match settings.backend {
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StorageBackend::Sled => open_sled(settings),
    }
}

#[cfg(feature = "sled")]
fn open_sled(settings: &StorageSettings) -> Result<Box<dyn Store>> {
    use anyhow::Context;

    let path = settings
        .path
        .as_ref()
        .context("the sled backend needs storage.path")?;
    Ok(Box::new(neofs_store::SledStore::open(path)?))
}

#[cfg(not(feature = "sled"))]
fn open_sled(_settings: &StorageSettings) -> Result<Box<dyn Store>> {
    anyhow::bail!("morph-replay was built without the sled feature")
}
