//! Alphabet contract.
//!
//! Each alphabet contract owns a share of the governance token and votes
//! for a consensus validator once the inner ring agrees on the candidate
//! list for the current epoch. Ballots live for one epoch only.

use neofs_primitives::PublicKey;
use neofs_store::ColumnId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ballot::{threshold, BallotLedger, RetentionPolicy};
use crate::context::ExecutionContext;
use crate::decision::DecisionBuilder;
use crate::error::{ContractError, ContractResult};
use crate::inner_ring;
use crate::netmap::NetmapContract;
use crate::outcome::{Outcome, Rejection, Resolution};
use crate::quorum::{Proposal, Quorum};

const CONTRACT: &str = "alphabet";
const IDENTITY_KEY: &[u8] = b"identity";

/// Host side of validator voting.
pub trait ValidatorVoting {
    /// Casts the vote of contract `account` for `candidate`. Returns false
    /// when the host refused the vote.
    fn vote(&self, account: &str, candidate: &PublicKey) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Identity {
    name: String,
    index: u64,
    total: u64,
}

/// Alphabet contract bound to its storage column.
#[derive(Debug, Clone)]
pub struct AlphabetContract {
    netmap: NetmapContract,
    quorum: Quorum,
}

impl AlphabetContract {
    pub const COLUMN: ColumnId = ColumnId::new("alphabet");

    pub fn new(netmap: NetmapContract) -> Self {
        Self::with_column(netmap, Self::COLUMN)
    }

    /// Contract instance stored in `column`, for deployments running
    /// several alphabet contracts side by side.
    pub fn with_column(netmap: NetmapContract, column: ColumnId) -> Self {
        Self {
            netmap,
            quorum: Quorum::new(BallotLedger::new(column, RetentionPolicy::SameEpoch)),
        }
    }

    pub fn ledger(&self) -> &BallotLedger {
        self.quorum.ledger()
    }

    /// Deploys the contract as alphabet member `index` out of `total`.
    pub fn init(
        &self,
        ctx: &mut ExecutionContext<'_>,
        name: String,
        index: u64,
        total: u64,
    ) -> ContractResult<()> {
        let column = self.ledger().column();
        if ctx.load::<Identity>(column, IDENTITY_KEY)?.is_some() {
            return Err(ContractError::AlreadyInitialized { contract: CONTRACT });
        }
        if total == 0 || index >= total {
            return Err(ContractError::invalid_argument(
                "init",
                format!("index {index} out of {total} alphabet contracts"),
            ));
        }

        ctx.push_log(format!("{name} contract initialized"));
        info!(%name, index, total, "alphabet contract initialized");
        ctx.save(column, IDENTITY_KEY, &Identity { name, index, total })
    }

    pub fn name(&self, ctx: &ExecutionContext<'_>) -> ContractResult<String> {
        Ok(self.identity(ctx)?.name)
    }

    /// Votes to back `candidates` for `epoch`.
    ///
    /// Once the quorum agrees, this contract votes for the candidate at its
    /// own index. When the host refuses that vote the ballot stays open and
    /// the next authority's call retries it.
    pub fn vote(
        &self,
        ctx: &mut ExecutionContext<'_>,
        epoch: u64,
        candidates: Vec<PublicKey>,
        voting: &dyn ValidatorVoting,
    ) -> ContractResult<Outcome> {
        const METHOD: &str = "vote";

        let identity = self.identity(ctx)?;
        let authorities = self.netmap.inner_ring_list(ctx)?;
        let limit = usize::try_from(identity.total).unwrap_or(usize::MAX);
        let voter = inner_ring::invoker_within(ctx, &authorities, limit)
            .ok_or(ContractError::NotAuthority { method: METHOD })?;

        let current = self.netmap.epoch(ctx)?;
        if epoch != current {
            return Err(ContractError::InvalidEpoch {
                method: METHOD,
                requested: epoch,
                current,
            });
        }
        if candidates.is_empty() {
            return Err(ContractError::invalid_argument(METHOD, "empty candidate list"));
        }

        let id = DecisionBuilder::new("alphabet")
            .u64(epoch)
            .fields(&candidates)
            .finish();
        let proposal = Proposal {
            method: METHOD,
            id,
            voter,
            freshness: epoch,
            threshold: threshold(limit),
        };

        let slot = (identity.index % candidates.len() as u64) as usize;
        let candidate = candidates[slot];
        let name = identity.name;
        self.quorum.process(ctx, proposal, |ctx| {
            if voting.vote(&name, &candidate) {
                ctx.push_log(format!("{name}: successfully voted for validator"));
                Ok(Resolution::Applied)
            } else {
                ctx.push_log(format!("{name}: vote has been failed"));
                Ok(Resolution::Failed(Rejection::VoteFailed { candidate }))
            }
        })
    }

    pub fn version(&self) -> u32 {
        self.netmap.version()
    }

    fn identity(&self, ctx: &ExecutionContext<'_>) -> ContractResult<Identity> {
        ctx.load(self.ledger().column(), IDENTITY_KEY)?
            .ok_or(ContractError::NotInitialized { contract: CONTRACT })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::context::{invoke, Invocation};
    use neofs_config::GovernanceSettings;
    use neofs_store::MemoryStore;

    #[derive(Default)]
    struct Recorder {
        refuse: Cell<bool>,
        votes: RefCell<Vec<(String, PublicKey)>>,
    }

    impl ValidatorVoting for Recorder {
        fn vote(&self, account: &str, candidate: &PublicKey) -> bool {
            if self.refuse.get() {
                return false;
            }
            self.votes.borrow_mut().push((account.to_string(), *candidate));
            true
        }
    }

    fn key(b: u8) -> PublicKey {
        let mut bytes = [b; 33];
        bytes[0] = 0x03;
        PublicKey::from_bytes(&bytes).unwrap()
    }

    fn setup(index: u64, total: u64) -> (MemoryStore, AlphabetContract, Vec<PublicKey>) {
        let store = MemoryStore::new();
        let netmap = NetmapContract::new(&GovernanceSettings::default());
        let alphabet = AlphabetContract::new(netmap.clone());
        let ring: Vec<PublicKey> = (1..=4).map(key).collect();
        invoke(&store, &Invocation::at(0), |ctx| {
            netmap.init(ctx, ring.clone())?;
            alphabet.init(ctx, "az".to_string(), index, total)
        })
        .unwrap();
        (store, alphabet, ring)
    }

    fn vote(
        store: &MemoryStore,
        alphabet: &AlphabetContract,
        signer: PublicKey,
        epoch: u64,
        voting: &Recorder,
    ) -> ContractResult<Outcome> {
        let call = Invocation::at(1).signed_by(signer);
        invoke(store, &call, |ctx| {
            alphabet.vote(ctx, epoch, vec![key(20), key(21)], voting)
        })
        .map(|receipt| receipt.value)
    }

    #[test]
    fn votes_for_indexed_candidate_at_quorum() {
        let (store, alphabet, ring) = setup(1, 4);
        let recorder = Recorder::default();

        assert!(vote(&store, &alphabet, ring[0], 0, &recorder).unwrap().is_pending());
        assert!(vote(&store, &alphabet, ring[1], 0, &recorder).unwrap().is_pending());
        assert!(vote(&store, &alphabet, ring[2], 0, &recorder).unwrap().is_executed());

        assert_eq!(
            recorder.votes.borrow().as_slice(),
            &[("az".to_string(), key(21))]
        );
    }

    #[test]
    fn failed_vote_is_retried() {
        let (store, alphabet, ring) = setup(1, 4);
        let recorder = Recorder::default();
        recorder.refuse.set(true);

        for signer in &ring[..2] {
            vote(&store, &alphabet, *signer, 0, &recorder).unwrap();
        }
        let outcome = vote(&store, &alphabet, ring[2], 0, &recorder).unwrap();
        assert_eq!(
            outcome,
            Outcome::rejected(Rejection::VoteFailed { candidate: key(21) })
        );

        recorder.refuse.set(false);
        let outcome = vote(&store, &alphabet, ring[2], 0, &recorder).unwrap();
        assert!(outcome.is_executed());
        assert_eq!(recorder.votes.borrow().len(), 1);
    }

    #[test]
    fn threshold_follows_stored_total() {
        // Only the first authority takes part, threshold(1) == 1.
        let (store, alphabet, ring) = setup(0, 1);
        let recorder = Recorder::default();

        let err = vote(&store, &alphabet, ring[1], 0, &recorder).unwrap_err();
        assert!(matches!(err, ContractError::NotAuthority { .. }));
        assert!(vote(&store, &alphabet, ring[0], 0, &recorder).unwrap().is_executed());
        assert_eq!(recorder.votes.borrow()[0].1, key(20));
    }

    #[test]
    fn wrong_epoch_is_refused() {
        let (store, alphabet, ring) = setup(1, 4);
        let err = vote(&store, &alphabet, ring[0], 3, &Recorder::default()).unwrap_err();
        assert!(matches!(
            err,
            ContractError::InvalidEpoch {
                requested: 3,
                current: 0,
                ..
            }
        ));
    }

    #[test]
    fn init_validation() {
        let (store, alphabet, _) = setup(1, 4);
        let err = invoke(&store, &Invocation::at(2), |ctx| {
            alphabet.init(ctx, "buky".to_string(), 0, 4)
        })
        .unwrap_err();
        assert!(matches!(err, ContractError::AlreadyInitialized { .. }));

        let fresh = MemoryStore::new();
        let err = invoke(&fresh, &Invocation::at(0), |ctx| {
            alphabet.init(ctx, "buky".to_string(), 4, 4)
        })
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { .. }));
    }
}
