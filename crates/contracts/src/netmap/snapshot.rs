//! Epoch counter and the two snapshot generations.

use neofs_primitives::PublicKey;
use neofs_store::ColumnId;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{NetmapContract, NodeInfo, CONTRACT};
use crate::context::ExecutionContext;
use crate::decision::DecisionBuilder;
use crate::error::{ContractError, ContractResult};
use crate::inner_ring;
use crate::notification::Notification;
use crate::outcome::{Outcome, Rejection, Resolution};

const CURRENT_KEY: &[u8] = b"snapshotCurrent";
const PREVIOUS_KEY: &[u8] = b"snapshotPrevious";
const EPOCH_KEY: &[u8] = b"snapshotEpoch";

/// Snapshot generation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    Current,
    Previous,
}

impl Generation {
    /// Maps an epoch distance to a generation: 0 is current, 1 previous.
    pub fn from_diff(diff: i64) -> ContractResult<Self> {
        match diff {
            0 => Ok(Generation::Current),
            1 => Ok(Generation::Previous),
            other => Err(ContractError::InvalidSnapshotDiff(other)),
        }
    }
}

/// Epoch counter with the committed snapshots of this and the previous
/// epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpochSnapshots {
    pub epoch: u64,
    pub current: Vec<NodeInfo>,
    pub previous: Vec<NodeInfo>,
}

impl EpochSnapshots {
    pub fn load(ctx: &ExecutionContext<'_>, column: ColumnId) -> ContractResult<Self> {
        let epoch = ctx
            .load(column, EPOCH_KEY)?
            .ok_or(ContractError::NotInitialized { contract: CONTRACT })?;
        Ok(Self {
            epoch,
            current: ctx.load_or_default(column, CURRENT_KEY)?,
            previous: ctx.load_or_default(column, PREVIOUS_KEY)?,
        })
    }

    pub fn save(&self, ctx: &mut ExecutionContext<'_>, column: ColumnId) -> ContractResult<()> {
        ctx.save(column, EPOCH_KEY, &self.epoch)?;
        ctx.save(column, CURRENT_KEY, &self.current)?;
        ctx.save(column, PREVIOUS_KEY, &self.previous)
    }

    /// Locks `online` in as the snapshot of `epoch`, shifting the current
    /// snapshot into the previous slot. Returns false, changing nothing,
    /// when `epoch` is not above the stored one.
    pub fn advance(&mut self, epoch: u64, online: Vec<NodeInfo>) -> bool {
        if epoch <= self.epoch {
            return false;
        }
        self.previous = std::mem::replace(&mut self.current, online);
        self.epoch = epoch;
        true
    }

    pub fn generation(&self, generation: Generation) -> &[NodeInfo] {
        match generation {
            Generation::Current => &self.current,
            Generation::Previous => &self.previous,
        }
    }
}

impl NetmapContract {
    /// Votes to advance to `epoch`.
    pub fn new_epoch(
        &self,
        ctx: &mut ExecutionContext<'_>,
        epoch: u64,
    ) -> ContractResult<Outcome> {
        let authorities = self.inner_ring_list(ctx)?;
        let voter = inner_ring::authorize(ctx, &authorities, "newEpoch")?;
        self.advance_as(ctx, &authorities, epoch, voter)
    }

    /// Votes, as `voter`, to lock the working view in as the snapshot of
    /// `epoch`.
    ///
    /// A proposal for an epoch not above the stored one is refused without
    /// casting a vote.
    pub fn propose_advance(
        &self,
        ctx: &mut ExecutionContext<'_>,
        epoch: u64,
        voter: PublicKey,
    ) -> ContractResult<Outcome> {
        let authorities = self.inner_ring_list(ctx)?;
        Self::ensure_authority(ctx, &authorities, &voter, "newEpoch")?;
        self.advance_as(ctx, &authorities, epoch, voter)
    }

    /// Current epoch.
    pub fn epoch(&self, ctx: &ExecutionContext<'_>) -> ContractResult<u64> {
        ctx.load(Self::COLUMN, EPOCH_KEY)?
            .ok_or(ContractError::NotInitialized { contract: CONTRACT })
    }

    /// Snapshot of the current epoch.
    pub fn netmap(&self, ctx: &ExecutionContext<'_>) -> ContractResult<Vec<NodeInfo>> {
        self.generation(ctx, Generation::Current)
    }

    /// Snapshot `diff` epochs back; only 0 and 1 are retained.
    pub fn snapshot(
        &self,
        ctx: &ExecutionContext<'_>,
        diff: i64,
    ) -> ContractResult<Vec<NodeInfo>> {
        self.generation(ctx, Generation::from_diff(diff)?)
    }

    /// Snapshot committed for `epoch`.
    pub fn snapshot_by_epoch(
        &self,
        ctx: &ExecutionContext<'_>,
        epoch: u64,
    ) -> ContractResult<Vec<NodeInfo>> {
        let current = self.epoch(ctx)?;
        let diff = if epoch <= current {
            i64::try_from(current - epoch).unwrap_or(i64::MAX)
        } else {
            i64::try_from(epoch - current).map_or(i64::MIN, |ahead| -ahead)
        };
        self.snapshot(ctx, diff)
    }

    pub fn generation(
        &self,
        ctx: &ExecutionContext<'_>,
        generation: Generation,
    ) -> ContractResult<Vec<NodeInfo>> {
        let snapshots = EpochSnapshots::load(ctx, Self::COLUMN)?;
        Ok(snapshots.generation(generation).to_vec())
    }

    fn advance_as(
        &self,
        ctx: &mut ExecutionContext<'_>,
        authorities: &[PublicKey],
        epoch: u64,
        voter: PublicKey,
    ) -> ContractResult<Outcome> {
        const METHOD: &str = "newEpoch";

        let current = self.epoch(ctx)?;
        if epoch <= current {
            ctx.push_log(format!("{METHOD}: ignore stale epoch {epoch}"));
            return Ok(Outcome::rejected(Rejection::StaleEpoch {
                requested: epoch,
                current,
            }));
        }

        let id = DecisionBuilder::new("epoch").u64(epoch).finish();
        let proposal = self.proposal(ctx, METHOD, id, voter, authorities);
        self.quorum.process(ctx, proposal, |ctx| {
            let online = self.working_view(ctx)?.online();
            let mut snapshots = EpochSnapshots::load(ctx, Self::COLUMN)?;
            if !snapshots.advance(epoch, online) {
                return Ok(Resolution::Subsumed(Rejection::StaleEpoch {
                    requested: epoch,
                    current: snapshots.epoch,
                }));
            }
            snapshots.save(ctx, Self::COLUMN)?;

            info!(epoch, nodes = snapshots.current.len(), "new epoch");
            ctx.push_log(format!("{METHOD}: process new epoch"));
            ctx.notify(Notification::NewEpoch { epoch });
            Ok(Resolution::Applied)
        })
    }
}
