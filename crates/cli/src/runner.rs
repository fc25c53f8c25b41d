//! Replays scenario steps against a store.

use anyhow::{Context, Result};
use neofs_config::GovernanceSettings;
use neofs_contracts::{
    invoke, AlphabetContract, ContractResult, ExecutionContext, Invocation, NetmapContract,
    Notification, Receipt, ValidatorVoting,
};
use neofs_primitives::PublicKey;
use neofs_store::Store;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::scenario::{Deployment, Operation, Scenario, Step};

/// Host side of validator voting for replays.
#[derive(Debug, Clone, Copy)]
pub struct ReplayVoting {
    accept: bool,
}

impl ReplayVoting {
    pub fn new(accept: bool) -> Self {
        Self { accept }
    }
}

impl ValidatorVoting for ReplayVoting {
    fn vote(&self, account: &str, candidate: &PublicKey) -> bool {
        info!(account, %candidate, accepted = self.accept, "validator vote");
        self.accept
    }
}

/// Result of one step, printed as a JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub height: u64,
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
    pub writes: usize,
}

impl StepReport {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Netmap and alphabet contracts sharing one backend.
pub struct Runner<'a> {
    store: &'a dyn Store,
    netmap: NetmapContract,
    alphabet: AlphabetContract,
    voting: ReplayVoting,
}

impl<'a> Runner<'a> {
    pub fn new(store: &'a dyn Store, settings: &GovernanceSettings) -> Self {
        let netmap = NetmapContract::new(settings);
        Self {
            store,
            alphabet: AlphabetContract::new(netmap.clone()),
            netmap,
            voting: ReplayVoting::new(true),
        }
    }

    /// Deploys the contracts and replays every step.
    ///
    /// A step whose contract call fails is reported and the replay goes on.
    pub fn run(&mut self, scenario: &Scenario) -> Result<Vec<StepReport>> {
        self.deploy(&scenario.deploy)?;
        scenario
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.run_step(index, step))
            .collect()
    }

    pub fn deploy(&mut self, deploy: &Deployment) -> Result<()> {
        let config: Vec<Vec<u8>> = deploy
            .config
            .iter()
            .flat_map(|[key, value]| [key.as_bytes().to_vec(), value.as_bytes().to_vec()])
            .collect();

        let receipt = invoke(self.store, &Invocation::at(0), |ctx| {
            self.netmap.init(ctx, deploy.inner_ring.clone())?;
            self.netmap.init_config(ctx, &config)?;
            if let Some(alphabet) = &deploy.alphabet {
                self.alphabet
                    .init(ctx, alphabet.name.clone(), alphabet.index, alphabet.total)?;
            }
            Ok(())
        })
        .context("deployment failed")?;

        if let Some(alphabet) = &deploy.alphabet {
            self.voting = ReplayVoting::new(alphabet.accept_votes);
        }
        info!(
            authorities = deploy.inner_ring.len(),
            writes = receipt.writes,
            "contracts deployed"
        );
        Ok(())
    }

    /// Runs one step. Malformed arguments abort the replay; contract
    /// errors become part of the report.
    pub fn run_step(&self, index: usize, step: &Step) -> Result<StepReport> {
        let invocation = step
            .signers
            .iter()
            .fold(Invocation::at(step.height), |call, key| call.signed_by(*key));
        let method = step.operation.method();
        debug!(step = index, height = step.height, method, "replaying step");

        let netmap = &self.netmap;
        let report = match &step.operation {
            Operation::AddPeer { node_info } => {
                let node_info = decode_hex("node_info", node_info)?;
                self.call(&invocation, |ctx| netmap.add_peer(ctx, node_info))
            }
            Operation::UpdateState { state, public_key } => {
                let public_key = decode_hex("public_key", public_key)?;
                self.call(&invocation, |ctx| netmap.update_state(ctx, *state, &public_key))
            }
            Operation::NewEpoch { epoch } => {
                self.call(&invocation, |ctx| netmap.new_epoch(ctx, *epoch))
            }
            Operation::UpdateInnerRing { keys } => {
                self.call(&invocation, |ctx| netmap.update_inner_ring(ctx, keys.clone()))
            }
            Operation::SetConfig { id, key, value } => self.call(&invocation, |ctx| {
                netmap.set_config(
                    ctx,
                    id.as_bytes().to_vec(),
                    key.as_bytes().to_vec(),
                    value.as_bytes().to_vec(),
                )
            }),
            Operation::Register { node_info, voter } => {
                let node_info = decode_hex("node_info", node_info)?;
                self.call(&invocation, |ctx| {
                    let candidate = neofs_contracts::NodeInfo::from_bytes(node_info)?;
                    netmap.register(ctx, candidate, *voter)
                })
            }
            Operation::Deregister { public_key, voter } => {
                self.call(&invocation, |ctx| netmap.deregister(ctx, *public_key, *voter))
            }
            Operation::ProposeAdvance { epoch, voter } => {
                self.call(&invocation, |ctx| netmap.propose_advance(ctx, *epoch, *voter))
            }
            Operation::PruneBallots => self.call(&invocation, |ctx| netmap.prune_ballots(ctx)),
            Operation::Vote { epoch, candidates } => self.call(&invocation, |ctx| {
                self.alphabet
                    .vote(ctx, *epoch, candidates.clone(), &self.voting)
            }),
            Operation::Epoch => self.call(&invocation, |ctx| netmap.epoch(ctx)),
            Operation::Netmap => self.call(&invocation, |ctx| netmap.netmap(ctx)),
            Operation::Snapshot { diff } => {
                self.call(&invocation, |ctx| netmap.snapshot(ctx, *diff))
            }
            Operation::SnapshotByEpoch { epoch } => {
                self.call(&invocation, |ctx| netmap.snapshot_by_epoch(ctx, *epoch))
            }
            Operation::InnerRing => self.call(&invocation, |ctx| netmap.inner_ring_list(ctx)),
            Operation::Config { key } => self.call(&invocation, |ctx| {
                Ok(netmap.config(ctx, key.as_bytes())?.map(hex::encode))
            }),
            Operation::ListConfig => self.call(&invocation, |ctx| netmap.list_config(ctx)),
            Operation::WorkingView => {
                self.call(&invocation, |ctx| netmap.working_view_entries(ctx))
            }
        };

        let (value, error, logs, notifications, writes) = match report {
            Ok(receipt) => (
                Some(receipt.value),
                None,
                receipt.logs,
                receipt.notifications,
                receipt.writes,
            ),
            Err(err) => {
                warn!(step = index, method, error = %err, "step failed");
                (None, Some(err), Vec::new(), Vec::new(), 0)
            }
        };
        Ok(StepReport {
            step: index,
            height: step.height,
            method,
            value,
            error,
            logs,
            notifications,
            writes,
        })
    }

    fn call<T, F>(&self, invocation: &Invocation, entry: F) -> Result<Receipt<Value>, String>
    where
        T: Serialize,
        F: FnOnce(&mut ExecutionContext<'_>) -> ContractResult<T>,
    {
        let receipt = invoke(self.store, invocation, entry).map_err(|err| err.to_string())?;
        let value = serde_json::to_value(&receipt.value).map_err(|err| err.to_string())?;
        Ok(Receipt {
            value,
            logs: receipt.logs,
            notifications: receipt.notifications,
            writes: receipt.writes,
        })
    }
}

fn decode_hex(field: &str, text: &str) -> Result<Vec<u8>> {
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text).with_context(|| format!("{field} is not valid hex"))
}
