//! Working view of registered storage nodes.

use neofs_primitives::{PublicKey, PUBLIC_KEY_SIZE};
use serde::{Deserialize, Serialize};

use super::{NetmapContract, NetmapEntry, NodeInfo, NodeState, NETMAP_KEY};
use crate::context::ExecutionContext;
use crate::decision::DecisionBuilder;
use crate::error::{ContractError, ContractResult};
use crate::inner_ring;
use crate::notification::Notification;
use crate::outcome::{Outcome, Rejection, Resolution};

/// Nodes registered since deployment, not yet locked into a snapshot.
///
/// A node identity appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingView(Vec<NetmapEntry>);

impl WorkingView {
    pub fn entries(&self) -> &[NetmapEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &PublicKey) -> bool {
        self.0.iter().any(|entry| &entry.node.public_key() == key)
    }

    /// Appends `node` as online. Fails with the node's key when its identity
    /// is already present.
    pub fn insert(&mut self, node: NodeInfo) -> Result<(), PublicKey> {
        let key = node.public_key();
        if self.contains(&key) {
            return Err(key);
        }
        self.0.push(NetmapEntry {
            node,
            state: NodeState::Online,
        });
        Ok(())
    }

    /// Removes the node with identity `key`. Returns false when absent.
    pub fn remove(&mut self, key: &PublicKey) -> bool {
        let before = self.0.len();
        self.0.retain(|entry| &entry.node.public_key() != key);
        self.0.len() != before
    }

    /// Descriptors of online nodes, in registration order.
    pub fn online(&self) -> Vec<NodeInfo> {
        self.0
            .iter()
            .filter(|entry| entry.state == NodeState::Online)
            .map(|entry| entry.node.clone())
            .collect()
    }
}

impl NetmapContract {
    /// Registration request.
    ///
    /// An authority's call is a vote to add the node. A call signed by the
    /// node itself only raises an `AddPeer` notification for the inner ring.
    pub fn add_peer(
        &self,
        ctx: &mut ExecutionContext<'_>,
        node_info: Vec<u8>,
    ) -> ContractResult<Outcome> {
        const METHOD: &str = "addPeer";

        let authorities = self.inner_ring_list(ctx)?;
        let node = NodeInfo::from_bytes(node_info)?;

        match inner_ring::invoker(ctx, &authorities) {
            Some(voter) => self.vote_register(ctx, &authorities, node, voter),
            None => {
                if !ctx.check_witness(&node.public_key()) {
                    return Err(ContractError::WitnessCheckFailed { method: METHOD });
                }
                ctx.notify(Notification::AddPeer {
                    node_info: node.into_bytes(),
                });
                Ok(Outcome::Notified)
            }
        }
    }

    /// State change request. Authorities may only vote nodes offline.
    pub fn update_state(
        &self,
        ctx: &mut ExecutionContext<'_>,
        state: u8,
        public_key: &[u8],
    ) -> ContractResult<Outcome> {
        const METHOD: &str = "updateState";

        if public_key.len() != PUBLIC_KEY_SIZE {
            return Err(ContractError::invalid_argument(
                METHOD,
                format!("incorrect public key length {}", public_key.len()),
            ));
        }
        let key = PublicKey::from_bytes(public_key)?;
        let authorities = self.inner_ring_list(ctx)?;

        let Some(voter) = inner_ring::invoker(ctx, &authorities) else {
            if !ctx.check_witness(&key) {
                return Err(ContractError::WitnessCheckFailed { method: METHOD });
            }
            ctx.notify(Notification::UpdateState {
                state,
                public_key: key,
            });
            return Ok(Outcome::Notified);
        };

        match NodeState::try_from(state) {
            Ok(NodeState::Offline) => self.vote_deregister(ctx, &authorities, key, voter),
            Ok(NodeState::Online) | Err(_) => Err(ContractError::UnsupportedState {
                method: METHOD,
                state,
            }),
        }
    }

    /// Votes, as `voter`, to add `candidate` to the working view.
    ///
    /// Votes accumulate even for a node that turns out to be a duplicate;
    /// the identity check happens once the quorum is reached, and the first
    /// registration to reach it wins.
    pub fn register(
        &self,
        ctx: &mut ExecutionContext<'_>,
        candidate: NodeInfo,
        voter: PublicKey,
    ) -> ContractResult<Outcome> {
        let authorities = self.inner_ring_list(ctx)?;
        Self::ensure_authority(ctx, &authorities, &voter, "addPeer")?;
        self.vote_register(ctx, &authorities, candidate, voter)
    }

    /// Votes, as `voter`, to remove the node with identity `key`.
    pub fn deregister(
        &self,
        ctx: &mut ExecutionContext<'_>,
        key: PublicKey,
        voter: PublicKey,
    ) -> ContractResult<Outcome> {
        let authorities = self.inner_ring_list(ctx)?;
        Self::ensure_authority(ctx, &authorities, &voter, "updateState")?;
        self.vote_deregister(ctx, &authorities, key, voter)
    }

    /// Nodes registered since the contract was deployed.
    pub fn working_view_entries(
        &self,
        ctx: &ExecutionContext<'_>,
    ) -> ContractResult<WorkingView> {
        self.working_view(ctx)
    }

    fn vote_register(
        &self,
        ctx: &mut ExecutionContext<'_>,
        authorities: &[PublicKey],
        candidate: NodeInfo,
        voter: PublicKey,
    ) -> ContractResult<Outcome> {
        let id = DecisionBuilder::new("add_peer")
            .field(candidate.as_bytes())
            .finish();
        let proposal = self.proposal(ctx, "addPeer", id, voter, authorities);
        self.quorum.process(ctx, proposal, |ctx| {
            let mut view = self.working_view(ctx)?;
            if let Err(key) = view.insert(candidate) {
                return Ok(Resolution::Subsumed(Rejection::DuplicateNode { key }));
            }
            ctx.save(Self::COLUMN, NETMAP_KEY, &view)?;
            ctx.push_log("addPeer: add storage node to the network map");
            Ok(Resolution::Applied)
        })
    }

    fn vote_deregister(
        &self,
        ctx: &mut ExecutionContext<'_>,
        authorities: &[PublicKey],
        key: PublicKey,
        voter: PublicKey,
    ) -> ContractResult<Outcome> {
        let id = DecisionBuilder::new("delete").field(key).finish();
        let proposal = self.proposal(ctx, "updateState", id, voter, authorities);
        self.quorum.process(ctx, proposal, |ctx| {
            let mut view = self.working_view(ctx)?;
            if !view.remove(&key) {
                return Ok(Resolution::Subsumed(Rejection::UnknownNode { key }));
            }
            ctx.save(Self::COLUMN, NETMAP_KEY, &view)?;
            ctx.push_log("updateState: remove storage node from the network map");
            Ok(Resolution::Applied)
        })
    }
}
