//! Integration tests for threshold voting through the netmap contract.

use neofs_config::GovernanceSettings;
use neofs_contracts::{
    invoke, BallotLedger, Cast, ContractError, ContractResult, DecisionBuilder, ExecutionContext,
    Invocation, NetmapContract, Notification, Outcome, Receipt, Rejection, RetentionPolicy,
};
use neofs_primitives::PublicKey;
use neofs_store::{ColumnId, MemoryStore, Store};

fn key(b: u8) -> PublicKey {
    let mut bytes = [b; 33];
    bytes[0] = 0x02;
    PublicKey::from_bytes(&bytes).unwrap()
}

fn descriptor(b: u8, tail: &[u8]) -> Vec<u8> {
    let mut raw = vec![0x0a, 0x21, 0x03];
    raw.extend_from_slice(&[b; 32]);
    raw.extend_from_slice(tail);
    raw
}

fn node_key(b: u8) -> PublicKey {
    let mut bytes = [b; 33];
    bytes[0] = 0x03;
    PublicKey::from_bytes(&bytes).unwrap()
}

struct Network {
    store: MemoryStore,
    netmap: NetmapContract,
    ring: Vec<PublicKey>,
}

impl Network {
    fn deploy(authorities: u8) -> Self {
        let store = MemoryStore::new();
        let netmap = NetmapContract::new(&GovernanceSettings::default());
        let ring: Vec<PublicKey> = (1..=authorities).map(key).collect();
        invoke(&store, &Invocation::at(0), |ctx| netmap.init(ctx, ring.clone())).unwrap();
        Self {
            store,
            netmap,
            ring,
        }
    }

    fn call<T>(
        &self,
        height: u64,
        signer: Option<PublicKey>,
        f: impl FnOnce(&NetmapContract, &mut ExecutionContext<'_>) -> ContractResult<T>,
    ) -> ContractResult<Receipt<T>> {
        let mut invocation = Invocation::at(height);
        if let Some(signer) = signer {
            invocation = invocation.signed_by(signer);
        }
        invoke(&self.store, &invocation, |ctx| f(&self.netmap, ctx))
    }

    fn epoch(&self) -> u64 {
        self.call(0, None, |n, ctx| n.epoch(ctx)).unwrap().value
    }
}

#[test]
fn test_ledger_end_to_end_scenario() {
    // Authorities A, B, C, D; threshold(4) == 3.
    let store = MemoryStore::new();
    let ledger = BallotLedger::new(ColumnId::new("ledger"), RetentionPolicy::window(20));
    let op1 = DecisionBuilder::new("op").field("op1").finish();
    let (a, b, c) = (key(0xa), key(0xb), key(0xc));
    let mut fired = 0;

    for (voter, height, expected) in [(a, 10, 1), (b, 11, 2), (b, 12, 2), (c, 13, 3)] {
        invoke(&store, &Invocation::at(height), |ctx| {
            let votes = ledger.cast(ctx, op1, voter, height)?.votes();
            assert_eq!(votes, expected);
            if votes >= neofs_contracts::threshold(4) {
                fired += 1;
                ledger.discard(ctx, &op1)?;
            }
            Ok(())
        })
        .unwrap();
    }

    assert_eq!(fired, 1);
    let remaining = invoke(&store, &Invocation::at(14), |ctx| ledger.load(ctx)).unwrap();
    assert!(remaining.value.get(&op1).is_none());

    // A fresh cast after the discard starts over.
    let cast = invoke(&store, &Invocation::at(15), |ctx| ledger.cast(ctx, op1, a, 15)).unwrap();
    assert_eq!(cast.value, Cast::Counted(1));
}

#[test]
fn test_epoch_advance_end_to_end() {
    let net = Network::deploy(4);
    let [a, b, c, d] = [net.ring[0], net.ring[1], net.ring[2], net.ring[3]];

    let outcome = |height, voter| {
        net.call(height, Some(voter), |n, ctx| n.new_epoch(ctx, 1))
            .unwrap()
            .value
    };

    assert_eq!(outcome(10, a), Outcome::Pending { votes: 1, threshold: 3 });
    assert_eq!(outcome(11, b), Outcome::Pending { votes: 2, threshold: 3 });
    assert_eq!(outcome(12, b), Outcome::Pending { votes: 2, threshold: 3 });
    assert_eq!(net.epoch(), 0);

    let receipt = net
        .call(13, Some(c), |n, ctx| n.new_epoch(ctx, 1))
        .unwrap();
    assert_eq!(receipt.value, Outcome::Executed);
    assert_eq!(receipt.notifications, vec![Notification::NewEpoch { epoch: 1 }]);
    assert_eq!(net.epoch(), 1);

    // The late vote of D is now stale and casts nothing.
    let receipt = net.call(14, Some(d), |n, ctx| n.new_epoch(ctx, 1)).unwrap();
    assert_eq!(
        receipt.value,
        Outcome::rejected(Rejection::StaleEpoch {
            requested: 1,
            current: 1
        })
    );
    assert_eq!(receipt.writes, 0);
}

#[test]
fn test_vote_order_does_not_matter() {
    let orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 0, 1], [3, 1, 0]];
    for order in orders {
        let net = Network::deploy(4);
        let mut outcomes = Vec::new();
        for (i, voter) in order.iter().enumerate() {
            let voter = net.ring[*voter];
            outcomes.push(
                net.call(5 + i as u64, Some(voter), |n, ctx| n.new_epoch(ctx, 7))
                    .unwrap()
                    .value,
            );
        }
        assert_eq!(outcomes.last(), Some(&Outcome::Executed));
        assert_eq!(net.epoch(), 7);
    }
}

#[test]
fn test_abandoned_ballot_expires_after_block_diff() {
    let net = Network::deploy(4);
    let (a, b) = (net.ring[0], net.ring[1]);

    // Ballot for epoch 5 last touched at height 100.
    net.call(100, Some(a), |n, ctx| n.new_epoch(ctx, 5)).unwrap();
    let epoch5 = DecisionBuilder::new("epoch").u64(5).finish();

    // A cast at 120 keeps it; 120 - 100 == block_diff.
    net.call(120, Some(a), |n, ctx| n.new_epoch(ctx, 6)).unwrap();
    let ballots = net.call(120, None, |n, ctx| n.ledger().load(ctx)).unwrap().value;
    assert!(ballots.get(&epoch5).is_some());

    // A cast at 121 rewrites the sequence without it.
    net.call(121, Some(b), |n, ctx| n.new_epoch(ctx, 6)).unwrap();
    let ballots = net.call(121, None, |n, ctx| n.ledger().load(ctx)).unwrap().value;
    assert!(ballots.get(&epoch5).is_none());
    assert_eq!(ballots.len(), 1);

    // Votes for epoch 5 start from scratch.
    let outcome = net.call(122, Some(b), |n, ctx| n.new_epoch(ctx, 5)).unwrap().value;
    assert_eq!(outcome, Outcome::Pending { votes: 1, threshold: 3 });
}

#[test]
fn test_non_authority_vote_changes_nothing() {
    let net = Network::deploy(4);
    let outsider = key(0x77);

    let err = net
        .call(1, Some(outsider), |n, ctx| n.new_epoch(ctx, 1))
        .unwrap_err();
    assert!(matches!(err, ContractError::NotAuthority { .. }));

    let err = net
        .call(1, Some(outsider), |n, ctx| {
            n.set_config(ctx, b"1".to_vec(), b"k".to_vec(), b"v".to_vec())
        })
        .unwrap_err();
    assert!(matches!(err, ContractError::NotAuthority { .. }));

    let ballots = net.call(1, None, |n, ctx| n.ledger().load(ctx)).unwrap().value;
    assert!(ballots.is_empty());
}

#[test]
fn test_failed_precondition_leaves_no_partial_writes() {
    let net = Network::deploy(4);
    let a = net.ring[0];
    let before = net.store.scan_prefix(NetmapContract::COLUMN, b"").unwrap();

    let result = net.call(3, Some(a), |n, ctx| {
        n.new_epoch(ctx, 1)?;
        n.snapshot(ctx, 2)
    });
    assert!(matches!(result, Err(ContractError::InvalidSnapshotDiff(2))));

    let after = net.store.scan_prefix(NetmapContract::COLUMN, b"").unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_snapshot_generations() {
    let net = Network::deploy(1);
    let ir = net.ring[0];

    let mut height = 1;
    let mut register = |b: u8| {
        height += 1;
        let outcome = net
            .call(height, Some(ir), |n, ctx| n.add_peer(ctx, descriptor(b, b"")))
            .unwrap()
            .value;
        assert!(outcome.is_executed());
    };
    register(1);
    register(2);

    net.call(10, Some(ir), |n, ctx| n.new_epoch(ctx, 1)).unwrap();
    let current = net.call(10, None, |n, ctx| n.netmap(ctx)).unwrap().value;
    let keys: Vec<PublicKey> = current.iter().map(|n| n.public_key()).collect();
    assert_eq!(keys, vec![node_key(1), node_key(2)]);

    net.call(11, Some(ir), |n, ctx| {
        n.update_state(ctx, 2, node_key(1).as_bytes())
    })
    .unwrap();
    net.call(12, Some(ir), |n, ctx| n.new_epoch(ctx, 2)).unwrap();

    let current = net.call(12, None, |n, ctx| n.snapshot(ctx, 0)).unwrap().value;
    let previous = net.call(12, None, |n, ctx| n.snapshot(ctx, 1)).unwrap().value;
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].public_key(), node_key(2));
    assert_eq!(previous.len(), 2);

    net.call(13, Some(ir), |n, ctx| n.new_epoch(ctx, 3)).unwrap();
    let previous = net.call(13, None, |n, ctx| n.snapshot_by_epoch(ctx, 2)).unwrap().value;
    assert_eq!(previous.len(), 1);
    assert!(net
        .call(13, None, |n, ctx| n.snapshot_by_epoch(ctx, 1))
        .is_err());
}

#[test]
fn test_competing_registrations_first_wins() {
    let net = Network::deploy(4);
    let first = descriptor(9, b"first");
    let second = descriptor(9, b"second");

    // Both descriptors gather votes; the identity check happens at quorum.
    for (i, voter) in net.ring.iter().take(2).enumerate() {
        for info in [&first, &second] {
            let outcome = net
                .call(20 + i as u64, Some(*voter), |n, ctx| n.add_peer(ctx, info.clone()))
                .unwrap()
                .value;
            assert!(outcome.is_pending());
        }
    }

    let c = net.ring[2];
    let outcome = net.call(22, Some(c), |n, ctx| n.add_peer(ctx, first.clone())).unwrap().value;
    assert!(outcome.is_executed());

    let outcome = net.call(23, Some(c), |n, ctx| n.add_peer(ctx, second.clone())).unwrap().value;
    assert_eq!(
        outcome,
        Outcome::rejected(Rejection::DuplicateNode { key: node_key(9) })
    );

    let view = net.call(24, None, |n, ctx| n.working_view_entries(ctx)).unwrap().value;
    assert_eq!(view.len(), 1);
    assert_eq!(view.entries()[0].node.as_bytes(), first.as_slice());

    // Subsumed ballots are discarded too.
    let ballots = net.call(24, None, |n, ctx| n.ledger().load(ctx)).unwrap().value;
    assert!(ballots.is_empty());
}

#[test]
fn test_register_and_deregister_never_share_a_ballot() {
    let net = Network::deploy(4);
    let info = descriptor(4, b"");
    let a = net.ring[0];

    net.call(1, Some(a), |n, ctx| n.add_peer(ctx, info.clone())).unwrap();
    net.call(1, Some(a), |n, ctx| {
        n.update_state(ctx, 2, node_key(4).as_bytes())
    })
    .unwrap();

    let ballots = net.call(1, None, |n, ctx| n.ledger().load(ctx)).unwrap().value;
    assert_eq!(ballots.len(), 2);
    assert!(ballots.iter().all(|ballot| ballot.voters == vec![a]));
}

#[test]
fn test_deregister_unknown_node_is_named() {
    let net = Network::deploy(1);
    let outcome = net
        .call(1, Some(net.ring[0]), |n, ctx| {
            n.update_state(ctx, 2, node_key(3).as_bytes())
        })
        .unwrap()
        .value;
    assert_eq!(
        outcome,
        Outcome::rejected(Rejection::UnknownNode { key: node_key(3) })
    );
}

#[test]
fn test_stale_ballot_count_matches_next_vote() {
    let net = Network::deploy(4);
    let [a, b, c] = [net.ring[0], net.ring[1], net.ring[2]];
    let epoch4 = DecisionBuilder::new("epoch").u64(4).finish();

    net.call(10, Some(a), |n, ctx| n.new_epoch(ctx, 4)).unwrap();
    net.call(11, Some(b), |n, ctx| n.new_epoch(ctx, 4)).unwrap();

    // Far past the retention window, nothing has rewritten the sequence yet.
    let votes = net.call(100, None, |n, ctx| n.ballot_votes(ctx, &epoch4)).unwrap();
    assert_eq!(votes.value, 2);

    let outcome = net.call(100, Some(c), |n, ctx| n.new_epoch(ctx, 4)).unwrap().value;
    assert_eq!(outcome, Outcome::Executed);
    assert_eq!(net.epoch(), 4);

    let votes = net.call(101, None, |n, ctx| n.ballot_votes(ctx, &epoch4)).unwrap();
    assert_eq!(votes.value, 0);
}

#[test]
fn test_propose_advance_requires_signed_authority() {
    let net = Network::deploy(4);
    let [a, b, c] = [net.ring[0], net.ring[1], net.ring[2]];

    // Unsigned: the voter is in the ring but carries no witness.
    let err = net
        .call(5, None, |n, ctx| n.propose_advance(ctx, 1, a))
        .unwrap_err();
    assert!(matches!(err, ContractError::NotAuthority { .. }));

    // Signed by someone else than the claimed voter.
    let err = net
        .call(5, Some(b), |n, ctx| n.propose_advance(ctx, 1, a))
        .unwrap_err();
    assert!(matches!(err, ContractError::NotAuthority { .. }));

    // Signed, but not an authority.
    let outsider = key(0x77);
    let err = net
        .call(5, Some(outsider), |n, ctx| n.propose_advance(ctx, 1, outsider))
        .unwrap_err();
    assert!(matches!(err, ContractError::NotAuthority { .. }));

    let ballots = net.call(5, None, |n, ctx| n.ledger().load(ctx)).unwrap().value;
    assert!(ballots.is_empty());

    let mut outcomes = Vec::new();
    for (i, voter) in [a, b, c].into_iter().enumerate() {
        let outcome = net
            .call(6 + i as u64, Some(voter), |n, ctx| n.propose_advance(ctx, 1, voter))
            .unwrap()
            .value;
        outcomes.push(outcome);
    }
    assert_eq!(
        outcomes,
        vec![
            Outcome::Pending { votes: 1, threshold: 3 },
            Outcome::Pending { votes: 2, threshold: 3 },
            Outcome::Executed,
        ]
    );
    assert_eq!(net.epoch(), 1);
}

#[test]
fn test_propose_advance_stale_epoch_casts_nothing() {
    let net = Network::deploy(1);
    let ir = net.ring[0];
    net.call(1, Some(ir), |n, ctx| n.propose_advance(ctx, 2, ir)).unwrap();

    for stale in [1, 2] {
        let receipt = net
            .call(2, Some(ir), |n, ctx| n.propose_advance(ctx, stale, ir))
            .unwrap();
        assert_eq!(
            receipt.value,
            Outcome::rejected(Rejection::StaleEpoch {
                requested: stale,
                current: 2
            })
        );
        assert_eq!(receipt.writes, 0);
    }
    let ballots = net.call(2, None, |n, ctx| n.ledger().load(ctx)).unwrap().value;
    assert!(ballots.is_empty());
}

#[test]
fn test_direct_deregister() {
    let net = Network::deploy(4);
    let [a, b, c] = [net.ring[0], net.ring[1], net.ring[2]];
    for (i, voter) in [a, b, c].into_iter().enumerate() {
        net.call(1 + i as u64, Some(voter), |n, ctx| {
            n.add_peer(ctx, descriptor(6, b"addr"))
        })
        .unwrap();
    }
    let view = net.call(4, None, |n, ctx| n.working_view_entries(ctx)).unwrap().value;
    assert!(view.contains(&node_key(6)));

    let err = net
        .call(5, None, |n, ctx| n.deregister(ctx, node_key(6), a))
        .unwrap_err();
    assert!(matches!(err, ContractError::NotAuthority { .. }));

    let mut last = None;
    for (i, voter) in [a, b, c].into_iter().enumerate() {
        let outcome = net
            .call(5 + i as u64, Some(voter), |n, ctx| n.deregister(ctx, node_key(6), voter))
            .unwrap()
            .value;
        if i < 2 {
            assert!(outcome.is_pending());
        }
        last = Some(outcome);
    }
    assert_eq!(last, Some(Outcome::Executed));
    let view = net.call(8, None, |n, ctx| n.working_view_entries(ctx)).unwrap().value;
    assert!(view.is_empty());

    // The same deregistration again names the missing node.
    let mut last = None;
    for voter in [a, b, c] {
        last = Some(
            net.call(9, Some(voter), |n, ctx| n.deregister(ctx, node_key(6), voter))
                .unwrap()
                .value,
        );
    }
    assert_eq!(
        last,
        Some(Outcome::rejected(Rejection::UnknownNode { key: node_key(6) }))
    );
}
