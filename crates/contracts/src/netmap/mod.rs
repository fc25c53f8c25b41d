//! Netmap contract.
//!
//! Holds the inner ring list, the working view of registered storage nodes,
//! the two epoch snapshots and the network configuration. Every mutation
//! except deployment goes through the quorum gate.
//!
//! Storage layout inside the `netmap` column:
//!
//! | key | value |
//! |---|---|
//! | `innerring` | `Vec<PublicKey>` |
//! | `netmap` | [`WorkingView`] |
//! | `snapshotCurrent`, `snapshotPrevious` | `Vec<NodeInfo>` |
//! | `snapshotEpoch` | `u64` |
//! | `ballots` | [`crate::Ballots`] |
//! | `initconfig` | `bool` |
//! | `config<key>` | `Vec<u8>` |

mod config;
mod membership;
mod node;
mod snapshot;

pub use config::ConfigRecord;
pub use membership::WorkingView;
pub use node::{NetmapEntry, NodeInfo, NodeState};
pub use snapshot::{EpochSnapshots, Generation};

use neofs_config::GovernanceSettings;
use neofs_primitives::PublicKey;
use neofs_store::ColumnId;
use tracing::info;

use crate::ballot::{threshold, BallotLedger, RetentionPolicy, BALLOTS_KEY};
use crate::context::ExecutionContext;
use crate::decision::{DecisionBuilder, DecisionId};
use crate::error::{ContractError, ContractResult};
use crate::inner_ring;
use crate::outcome::{Outcome, Resolution};
use crate::quorum::{Proposal, Quorum};

const CONTRACT: &str = "netmap";

pub(crate) const INNER_RING_KEY: &[u8] = b"innerring";
pub(crate) const NETMAP_KEY: &[u8] = b"netmap";

/// Netmap contract bound to its storage column.
#[derive(Debug, Clone)]
pub struct NetmapContract {
    quorum: Quorum,
    version: u32,
}

impl NetmapContract {
    pub const COLUMN: ColumnId = ColumnId::new("netmap");

    pub fn new(settings: &GovernanceSettings) -> Self {
        let policy = RetentionPolicy::window(settings.block_diff);
        Self {
            quorum: Quorum::new(BallotLedger::new(Self::COLUMN, policy)),
            version: settings.contract_version,
        }
    }

    pub fn ledger(&self) -> &BallotLedger {
        self.quorum.ledger()
    }

    /// Deploys the contract with the initial inner ring.
    pub fn init(
        &self,
        ctx: &mut ExecutionContext<'_>,
        keys: Vec<PublicKey>,
    ) -> ContractResult<()> {
        if ctx
            .load::<Vec<PublicKey>>(Self::COLUMN, INNER_RING_KEY)?
            .is_some()
        {
            return Err(ContractError::AlreadyInitialized { contract: CONTRACT });
        }
        inner_ring::validate(&keys, "init")?;

        ctx.save(Self::COLUMN, INNER_RING_KEY, &keys)?;
        ctx.save(Self::COLUMN, NETMAP_KEY, &WorkingView::default())?;
        EpochSnapshots::default().save(ctx, Self::COLUMN)?;
        ctx.save(Self::COLUMN, BALLOTS_KEY, &crate::ballot::Ballots::new())?;

        ctx.push_log("netmap contract initialized");
        info!(authorities = keys.len(), "netmap contract initialized");
        Ok(())
    }

    /// Current inner ring, read from storage on every call.
    pub fn inner_ring_list(&self, ctx: &ExecutionContext<'_>) -> ContractResult<Vec<PublicKey>> {
        ctx.load(Self::COLUMN, INNER_RING_KEY)?
            .ok_or(ContractError::NotInitialized { contract: CONTRACT })
    }

    /// Votes to replace the inner ring with `keys`.
    pub fn update_inner_ring(
        &self,
        ctx: &mut ExecutionContext<'_>,
        keys: Vec<PublicKey>,
    ) -> ContractResult<Outcome> {
        const METHOD: &str = "updateInnerRing";

        let authorities = self.inner_ring_list(ctx)?;
        let voter = inner_ring::authorize(ctx, &authorities, METHOD)?;
        inner_ring::validate(&keys, METHOD)?;

        let id = DecisionBuilder::new("inner_ring").fields(&keys).finish();
        let proposal = self.proposal(ctx, METHOD, id, voter, &authorities);
        self.quorum.process(ctx, proposal, |ctx| {
            ctx.save(Self::COLUMN, INNER_RING_KEY, &keys)?;
            ctx.push_log("updateInnerRing: inner ring list updated");
            Ok(Resolution::Applied)
        })
    }

    /// Voters recorded for a pending decision. Matches the count the next
    /// vote for `id` adds to, even for a ballot past its retention window.
    pub fn ballot_votes(
        &self,
        ctx: &ExecutionContext<'_>,
        id: &DecisionId,
    ) -> ContractResult<usize> {
        self.ledger().votes(ctx, id)
    }

    /// Drops ballots that expired at the current height.
    pub fn prune_ballots(&self, ctx: &mut ExecutionContext<'_>) -> ContractResult<usize> {
        let now = ctx.height();
        self.ledger().prune(ctx, now)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn working_view(&self, ctx: &ExecutionContext<'_>) -> ContractResult<WorkingView> {
        ctx.load_or_default(Self::COLUMN, NETMAP_KEY)
    }

    /// Refuses voters that are not current authorities with a witness.
    fn ensure_authority(
        ctx: &ExecutionContext<'_>,
        authorities: &[PublicKey],
        voter: &PublicKey,
        method: &'static str,
    ) -> ContractResult<()> {
        if authorities.contains(voter) && ctx.check_witness(voter) {
            Ok(())
        } else {
            Err(ContractError::NotAuthority { method })
        }
    }

    fn proposal(
        &self,
        ctx: &ExecutionContext<'_>,
        method: &'static str,
        id: DecisionId,
        voter: PublicKey,
        authorities: &[PublicKey],
    ) -> Proposal {
        Proposal {
            method,
            id,
            voter,
            freshness: ctx.height(),
            threshold: threshold(authorities.len()),
        }
    }
}
