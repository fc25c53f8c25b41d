//! Storage abstractions backing the NeoFS morph governance contracts.
//!
//! The crate exposes an in-memory implementation used for tests and replay
//! tooling, plus an optional Sled-backed persistent store. Both share the
//! [`Store`] trait. Contract invocations never write to a backend directly:
//! they run against an [`Overlay`] that buffers writes and is committed as a
//! single [`WriteBatch`] once the invocation succeeds.

mod error;
mod memory;
mod overlay;
#[cfg(feature = "sled")]
mod sled_store;
mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use overlay::Overlay;
#[cfg(feature = "sled")]
pub use sled_store::SledStore;
pub use traits::{BatchOp, ColumnId, Store, StoreExt, WriteBatch};
