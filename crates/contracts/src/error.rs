//! Error types for contract invocations.
//!
//! An `Err` from an entry point always means the invocation was refused
//! before anything was persisted: the caller's vote did not count. Outcomes
//! that did record a vote are reported through [`crate::Outcome`] instead.

use neofs_primitives::PrimitiveError;
use neofs_store::StoreError;
use thiserror::Error;

/// Errors that abort a contract invocation.
#[derive(Error, Debug)]
pub enum ContractError {
    /// A voted method was called by a key outside the inner ring.
    #[error("{method}: invoked by non inner ring node")]
    NotAuthority {
        /// Method name.
        method: &'static str,
    },

    /// A storage node request was not signed by the node itself.
    #[error("{method}: witness check failed")]
    WitnessCheckFailed {
        /// Method name.
        method: &'static str,
    },

    /// One-shot initialisation was attempted twice.
    #[error("{contract}: contract already initialized")]
    AlreadyInitialized {
        /// Contract name.
        contract: &'static str,
    },

    /// The contract has not been initialised yet.
    #[error("{contract}: contract is not initialized")]
    NotInitialized {
        /// Contract name.
        contract: &'static str,
    },

    /// An argument is malformed.
    #[error("{method}: invalid argument: {message}")]
    InvalidArgument {
        /// Method name.
        method: &'static str,
        /// Error message.
        message: String,
    },

    /// The requested node state transition is not supported.
    #[error("{method}: unsupported state {state}")]
    UnsupportedState {
        /// Method name.
        method: &'static str,
        /// Raw state value.
        state: u8,
    },

    /// Snapshot generation offset outside `0..=1`.
    #[error("snapshot: incorrect diff {0}")]
    InvalidSnapshotDiff(i64),

    /// The supplied epoch does not match the current one.
    #[error("{method}: invalid epoch {requested}, current epoch is {current}")]
    InvalidEpoch {
        /// Method name.
        method: &'static str,
        /// Epoch passed by the caller.
        requested: u64,
        /// Epoch stored by the netmap contract.
        current: u64,
    },

    /// A persisted record has an unexpected schema version.
    #[error("codec: {0}")]
    Codec(String),

    /// Storage backend error.
    #[error("storage: {0}")]
    Storage(#[from] StoreError),

    /// Malformed key or digest.
    #[error("primitive: {0}")]
    Primitive(#[from] PrimitiveError),
}

impl ContractError {
    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(method: &'static str, message: S) -> Self {
        Self::InvalidArgument {
            method,
            message: message.into(),
        }
    }

    /// Create a codec error.
    pub fn codec<S: Into<String>>(message: S) -> Self {
        Self::Codec(message.into())
    }
}

/// Result type for contract operations.
pub type ContractResult<T> = std::result::Result<T, ContractError>;
