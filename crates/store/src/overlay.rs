use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::StoreError;
use crate::traits::{BatchOp, ColumnId, Store, WriteBatch};

type Changes = BTreeMap<(ColumnId, Vec<u8>), Option<Vec<u8>>>;

/// Write-buffering view over a backend.
///
/// Reads see the overlay's own pending writes first and fall through to the
/// backend otherwise. Nothing reaches the backend until [`Overlay::commit`],
/// which hands every pending change over as one [`WriteBatch`]. Dropping an
/// overlay discards its writes, which is how a failed invocation leaves the
/// persisted state untouched.
pub struct Overlay<'a> {
    base: &'a dyn Store,
    changes: Mutex<Changes>,
}

impl<'a> Overlay<'a> {
    pub fn new(base: &'a dyn Store) -> Self {
        Self {
            base,
            changes: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns true when the overlay holds uncommitted writes.
    pub fn is_dirty(&self) -> bool {
        !self.changes.lock().is_empty()
    }

    /// Converts pending changes into a batch, ordered by column and key.
    pub fn into_batch(self) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for ((column, key), value) in self.changes.into_inner() {
            match value {
                Some(value) => batch.put(column, key, value),
                None => batch.delete(column, key),
            }
        }
        batch
    }

    /// Applies every pending change to the backend atomically and returns the
    /// number of operations written.
    pub fn commit(self) -> Result<usize, StoreError> {
        let base = self.base;
        let batch = self.into_batch();
        let len = batch.len();
        if len > 0 {
            base.write_batch(batch)?;
        }
        trace!(operations = len, "overlay committed");
        Ok(len)
    }
}

impl Store for Overlay<'_> {
    fn get(&self, column: ColumnId, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(pending) = self.changes.lock().get(&(column, key.to_vec())) {
            return Ok(pending.clone());
        }
        self.base.get(column, key)
    }

    fn put(&self, column: ColumnId, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        self.changes.lock().insert((column, key), Some(value));
        Ok(())
    }

    fn delete(&self, column: ColumnId, key: &[u8]) -> Result<(), StoreError> {
        self.changes.lock().insert((column, key.to_vec()), None);
        Ok(())
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut changes = self.changes.lock();
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { column, key, value } => {
                    changes.insert((column, key), Some(value));
                }
                BatchOp::Delete { column, key } => {
                    changes.insert((column, key), None);
                }
            }
        }
        Ok(())
    }

    fn scan_prefix(
        &self,
        column: ColumnId,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.scan_prefix(column, prefix)?.into_iter().collect();

        let changes = self.changes.lock();
        for ((col, key), value) in changes.range((column, prefix.to_vec())..) {
            if *col != column || !key.starts_with(prefix) {
                break;
            }
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}
