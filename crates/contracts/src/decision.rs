//! Content-derived decision identifiers.
//!
//! Two authorities proposing the same operation must land on the same
//! ballot, so a decision id depends only on what the operation does, never on
//! who proposes it. The digest covers a domain tag plus every argument field,
//! each prefixed with its length: moving a byte from one field to the next
//! changes the id.

use std::fmt;

use neofs_primitives::Hash256;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifier of a proposed operation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DecisionId(Hash256);

impl DecisionId {
    pub const fn from_hash(hash: Hash256) -> Self {
        Self(hash)
    }

    pub fn hash(&self) -> &Hash256 {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecisionId({})", self.0)
    }
}

/// Incremental builder for [`DecisionId`].
///
/// ```
/// use neofs_contracts::DecisionBuilder;
///
/// let a = DecisionBuilder::new("epoch").u64(42).finish();
/// let b = DecisionBuilder::new("epoch").u64(42).finish();
/// let c = DecisionBuilder::new("epoch").u64(43).finish();
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
#[derive(Clone)]
pub struct DecisionBuilder {
    hasher: Sha256,
}

impl DecisionBuilder {
    pub fn new(tag: &str) -> Self {
        let builder = Self {
            hasher: Sha256::new(),
        };
        builder.field(tag.as_bytes())
    }

    /// Appends a length-prefixed byte field.
    pub fn field(mut self, bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
        self
    }

    /// Appends every item of `fields`, preceded by their count.
    pub fn fields<I, B>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = B>,
        I::IntoIter: ExactSizeIterator,
        B: AsRef<[u8]>,
    {
        let fields = fields.into_iter();
        let mut builder = self.u64(fields.len() as u64);
        for field in fields {
            builder = builder.field(field);
        }
        builder
    }

    pub fn u64(self, value: u64) -> Self {
        self.field(value.to_le_bytes())
    }

    pub fn finish(self) -> DecisionId {
        DecisionId(Hash256::new(self.hasher.finalize().into()))
    }
}
