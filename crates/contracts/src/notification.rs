//! Events emitted by contract invocations.

use neofs_primitives::PublicKey;
use serde::{Deserialize, Serialize};

/// Notification raised during an invocation and delivered with its receipt.
///
/// Notifications are only published when the invocation commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    /// A storage node asked to join the network map.
    AddPeer {
        /// Raw node descriptor.
        #[serde(with = "hex_bytes")]
        node_info: Vec<u8>,
    },
    /// A storage node asked to change its state.
    UpdateState {
        /// Requested state tag.
        state: u8,
        /// Node identity.
        public_key: PublicKey,
    },
    /// The epoch advanced.
    NewEpoch {
        /// New epoch number.
        epoch: u64,
    },
    /// A configuration value was replaced.
    SetConfig {
        /// Request identifier supplied by the proposer.
        #[serde(with = "hex_bytes")]
        id: Vec<u8>,
        /// Configuration key.
        #[serde(with = "hex_bytes")]
        key: Vec<u8>,
        /// New value.
        #[serde(with = "hex_bytes")]
        value: Vec<u8>,
    },
}

impl Notification {
    /// Event name as seen by chain listeners.
    pub fn name(&self) -> &'static str {
        match self {
            Notification::AddPeer { .. } => "AddPeer",
            Notification::UpdateState { .. } => "UpdateState",
            Notification::NewEpoch { .. } => "NewEpoch",
            Notification::SetConfig { .. } => "SetConfig",
        }
    }
}

pub(crate) mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(bytes))
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            hex::decode(text).map_err(D::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer)
        }
    }
}
