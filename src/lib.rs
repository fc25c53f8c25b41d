//! # neofs-morph: NeoFS governance contracts in Rust
//!
//! Threshold-voted governance for the NeoFS morph chain. The inner ring, a
//! fixed set of authority keys, agrees on node registrations, epoch changes,
//! configuration updates and validator votes by casting ballots. An action
//! runs exactly once, when the `n/3*2+1`-th distinct authority votes for it.
//!
//! ## Quick Start
//!
//! ```rust
//! use neofs_morph::prelude::*;
//!
//! let key = |b: u8| {
//!     let mut bytes = [b; 33];
//!     bytes[0] = 0x02;
//!     PublicKey::from_bytes(&bytes).unwrap()
//! };
//! let ring: Vec<PublicKey> = (1..=4).map(key).collect();
//!
//! let store = MemoryStore::new();
//! let netmap = NetmapContract::new(&GovernanceSettings::default());
//! invoke(&store, &Invocation::at(0), |ctx| netmap.init(ctx, ring.clone())).unwrap();
//!
//! let mut last = None;
//! for (height, voter) in ring.iter().take(3).enumerate() {
//!     let call = Invocation::at(height as u64 + 1).signed_by(*voter);
//!     last = Some(invoke(&store, &call, |ctx| netmap.new_epoch(ctx, 1)).unwrap().value);
//! }
//! assert_eq!(last, Some(Outcome::Executed));
//! ```
//!
//! ## Architecture
//!
//! - [`primitives`] - public keys and digests
//! - [`store`] - column store trait, in-memory and sled backends, write overlay
//! - [`config`] - TOML settings
//! - [`contracts`] - ballot ledger, quorum gate, netmap and alphabet contracts

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use neofs_config as config;
pub use neofs_contracts as contracts;
pub use neofs_primitives as primitives;
pub use neofs_store as store;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for contract hosts.
pub mod prelude {
    pub use crate::config::{GovernanceSettings, Settings};
    pub use crate::contracts::{
        invoke, threshold, AlphabetContract, ContractError, ContractResult, DecisionBuilder,
        DecisionId, ExecutionContext, Invocation, NetmapContract, NodeInfo, NodeState,
        Notification, Outcome, Receipt, Rejection, ValidatorVoting,
    };
    pub use crate::primitives::{Hash256, PublicKey};
    pub use crate::store::{MemoryStore, Store};
}
