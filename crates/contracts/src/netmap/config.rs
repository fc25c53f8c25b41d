//! Network configuration records.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{NetmapContract, CONTRACT};
use crate::context::ExecutionContext;
use crate::decision::DecisionBuilder;
use crate::error::{ContractError, ContractResult};
use crate::inner_ring;
use crate::notification::{hex_bytes, Notification};
use crate::outcome::{Outcome, Resolution};

const CONFIG_PREFIX: &[u8] = b"config";
const CONFIGURED_KEY: &[u8] = b"initconfig";

/// One configuration key and its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(with = "hex_bytes")]
    pub key: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub value: Vec<u8>,
}

fn storage_key(key: &[u8]) -> Vec<u8> {
    [CONFIG_PREFIX, key].concat()
}

impl NetmapContract {
    /// Value stored under configuration `key`.
    pub fn config(
        &self,
        ctx: &ExecutionContext<'_>,
        key: &[u8],
    ) -> ContractResult<Option<Vec<u8>>> {
        ctx.load(Self::COLUMN, &storage_key(key))
    }

    /// Every configuration record, ordered by key.
    pub fn list_config(&self, ctx: &ExecutionContext<'_>) -> ContractResult<Vec<ConfigRecord>> {
        let entries = ctx.store().scan_prefix(Self::COLUMN, CONFIG_PREFIX)?;
        let mut records = Vec::with_capacity(entries.len());
        for (stored_key, _) in entries {
            let value: Vec<u8> = ctx
                .load(Self::COLUMN, &stored_key)?
                .unwrap_or_default();
            records.push(ConfigRecord {
                key: stored_key[CONFIG_PREFIX.len()..].to_vec(),
                value,
            });
        }
        Ok(records)
    }

    /// Votes to set configuration `key` to `value`.
    ///
    /// `id` distinguishes otherwise identical requests, so the same value
    /// can be voted in again after it was changed.
    pub fn set_config(
        &self,
        ctx: &mut ExecutionContext<'_>,
        id: Vec<u8>,
        key: Vec<u8>,
        value: Vec<u8>,
    ) -> ContractResult<Outcome> {
        const METHOD: &str = "setConfig";

        let authorities = self.inner_ring_list(ctx)?;
        let voter = inner_ring::authorize(ctx, &authorities, METHOD)?;

        let decision = DecisionBuilder::new("config")
            .field(&id)
            .field(&key)
            .field(&value)
            .finish();
        let proposal = self.proposal(ctx, METHOD, decision, voter, &authorities);
        self.quorum.process(ctx, proposal, |ctx| {
            ctx.save(Self::COLUMN, &storage_key(&key), &value)?;
            ctx.push_log("setConfig: configuration has been updated");
            ctx.notify(Notification::SetConfig { id, key, value });
            Ok(Resolution::Applied)
        })
    }

    /// Installs the initial configuration from alternating keys and values.
    /// Can only run once.
    pub fn init_config(
        &self,
        ctx: &mut ExecutionContext<'_>,
        args: &[Vec<u8>],
    ) -> ContractResult<()> {
        if ctx.load::<bool>(Self::COLUMN, CONFIGURED_KEY)?.is_some() {
            return Err(ContractError::AlreadyInitialized { contract: CONTRACT });
        }
        if args.len() % 2 != 0 {
            return Err(ContractError::invalid_argument(
                "initConfig",
                "odd number of key and value arguments",
            ));
        }

        for pair in args.chunks_exact(2) {
            ctx.save(Self::COLUMN, &storage_key(&pair[0]), &pair[1])?;
        }
        ctx.save(Self::COLUMN, CONFIGURED_KEY, &true)?;

        ctx.push_log("netmap: config has been installed");
        info!(records = args.len() / 2, "netmap config installed");
        Ok(())
    }
}
