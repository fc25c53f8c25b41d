//! # NeoFS Contracts
//!
//! Governance contracts of the NeoFS morph chain. Every state change they
//! accept is confirmed by a byzantine quorum of inner ring members before it
//! is applied.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  NetmapContract            AlphabetContract   │
//! │  (membership, epochs,      (validator votes)  │
//! │   inner ring, config)                         │
//! └──────────────┬───────────────────┬────────────┘
//!                ▼                   ▼
//! ┌──────────────────────────────────────────────┐
//! │  Quorum gate: authorise → cast → threshold   │
//! │               → execute once → discard       │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │  BallotLedger (decision id → voters, fresh)  │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │  ExecutionContext over a neofs-store Overlay │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use neofs_contracts::{invoke, Invocation, NetmapContract};
//! use neofs_config::GovernanceSettings;
//! use neofs_primitives::PublicKey;
//! use neofs_store::MemoryStore;
//!
//! let key = |b: u8| PublicKey::from_bytes(&[&[0x02][..], &[b; 32][..]].concat()).unwrap();
//! let authorities = vec![key(1), key(2), key(3), key(4)];
//!
//! let store = MemoryStore::new();
//! let netmap = NetmapContract::new(&GovernanceSettings::default());
//! invoke(&store, &Invocation::at(0), |ctx| netmap.init(ctx, authorities.clone())).unwrap();
//!
//! for (i, voter) in authorities.iter().take(3).enumerate() {
//!     let call = Invocation::at(10 + i as u64).signed_by(*voter);
//!     invoke(&store, &call, |ctx| netmap.new_epoch(ctx, 1)).unwrap();
//! }
//!
//! let epoch = invoke(&store, &Invocation::at(13), |ctx| netmap.epoch(ctx)).unwrap();
//! assert_eq!(epoch.value, 1);
//! ```

pub mod alphabet;
pub mod ballot;
pub mod context;
pub mod decision;
pub mod error;
pub mod inner_ring;
pub mod netmap;
pub mod notification;
pub mod outcome;
pub mod quorum;
pub mod record;

// Re-exports
pub use alphabet::{AlphabetContract, ValidatorVoting};
pub use ballot::{threshold, Ballot, BallotLedger, Ballots, Cast, RetentionPolicy};
pub use context::{invoke, ExecutionContext, Invocation, Receipt};
pub use decision::{DecisionBuilder, DecisionId};
pub use error::{ContractError, ContractResult};
pub use netmap::{
    ConfigRecord, EpochSnapshots, Generation, NetmapContract, NetmapEntry, NodeInfo, NodeState,
    WorkingView,
};
pub use notification::Notification;
pub use outcome::{Outcome, Rejection, Resolution};
pub use quorum::{Proposal, Quorum};
