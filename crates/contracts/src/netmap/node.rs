//! Storage node descriptors.

use std::fmt;

use neofs_primitives::{PublicKey, NODE_INFO_KEY_OFFSET, PUBLIC_KEY_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{ContractError, ContractResult};
use crate::notification::hex_bytes;

/// Raw node descriptor blob.
///
/// The descriptor encoding belongs to the storage nodes; the contract only
/// relies on the identity key at bytes `2..35`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    key: PublicKey,
    #[serde(with = "hex_bytes")]
    raw: Vec<u8>,
}

impl NodeInfo {
    /// Wraps a descriptor, checking that it carries an identity key.
    pub fn from_bytes(raw: Vec<u8>) -> ContractResult<Self> {
        let end = NODE_INFO_KEY_OFFSET + PUBLIC_KEY_SIZE;
        let key = raw.get(NODE_INFO_KEY_OFFSET..end).ok_or_else(|| {
            ContractError::invalid_argument(
                "addPeer",
                format!("node info is {} bytes, expected at least {end}", raw.len()),
            )
        })?;
        let key = PublicKey::from_bytes(key)?;
        Ok(Self { key, raw })
    }

    /// Identity key of the node.
    pub fn public_key(&self) -> PublicKey {
        self.key
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }
}

impl fmt::Debug for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeInfo")
            .field("key", &self.key)
            .field("len", &self.raw.len())
            .finish()
    }
}

/// Node state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum NodeState {
    Online = 1,
    Offline = 2,
}

impl NodeState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for NodeState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NodeState::Online),
            2 => Ok(NodeState::Offline),
            other => Err(other),
        }
    }
}

/// Working view entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetmapEntry {
    pub node: NodeInfo,
    pub state: NodeState,
}

#[cfg(test)]
pub(crate) fn descriptor(key_byte: u8, tail: &[u8]) -> Vec<u8> {
    let mut raw = vec![0x0a, 0x21, 0x02];
    raw.extend_from_slice(&[key_byte; 32]);
    raw.extend_from_slice(tail);
    raw
}
