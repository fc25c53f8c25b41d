use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

/// Named identifier for a column family.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ColumnId(pub &'static str);

impl ColumnId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl From<&'static str> for ColumnId {
    #[inline]
    fn from(value: &'static str) -> Self {
        ColumnId::new(value)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Operation to be applied via a write batch.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BatchOp {
    Put {
        column: ColumnId,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Delete {
        column: ColumnId,
        key: Vec<u8>,
    },
}

/// Ordered set of operations that should be applied atomically.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    #[inline]
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    #[inline]
    pub fn put(&mut self, column: ColumnId, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(BatchOp::Put { column, key, value });
    }

    #[inline]
    pub fn delete(&mut self, column: ColumnId, key: Vec<u8>) {
        self.ops.push(BatchOp::Delete { column, key });
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

/// Abstraction exposed by storage backends.
pub trait Store: Send + Sync {
    fn get(&self, column: ColumnId, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&self, column: ColumnId, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError>;

    fn delete(&self, column: ColumnId, key: &[u8]) -> Result<(), StoreError>;

    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Returns every entry whose key starts with `prefix`, ordered by key.
    fn scan_prefix(
        &self,
        column: ColumnId,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}

/// Convenience helpers for storing serde values as bincode blobs.
pub trait StoreExt: Store {
    fn put_encoded<V: Serialize + ?Sized>(
        &self,
        column: ColumnId,
        key: &[u8],
        value: &V,
    ) -> Result<(), StoreError> {
        let bytes =
            bincode::serialize(value).map_err(|err| StoreError::codec(err.to_string()))?;
        self.put(column, key.to_vec(), bytes)
    }

    fn get_decoded<V: DeserializeOwned>(
        &self,
        column: ColumnId,
        key: &[u8],
    ) -> Result<Option<V>, StoreError> {
        match self.get(column, key)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|err| StoreError::codec(format!("decode error: {err}"))),
            None => Ok(None),
        }
    }

    fn contains(&self, column: ColumnId, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(column, key)?.is_some())
    }
}

impl<T: Store + ?Sized> StoreExt for T {}
