use std::path::Path;

use sled::{Batch, Db, IVec};
use tracing::debug;

use crate::{
    error::StoreError,
    traits::{BatchOp, ColumnId, Store, WriteBatch},
};

/// Persistent store backed by the `sled` embedded database.
///
/// All columns share the default tree. A stored key is the column name,
/// prefixed with its length, followed by the caller's key, so one
/// `apply_batch` covers every column an invocation touched.
pub struct SledStore {
    db: Db,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(backend)?;
        Ok(Self { db })
    }
}

fn backend(err: sled::Error) -> StoreError {
    StoreError::backend(err.to_string())
}

fn column_key(column: ColumnId, key: &[u8]) -> Result<Vec<u8>, StoreError> {
    let name = column.name().as_bytes();
    let len = u8::try_from(name.len())
        .map_err(|_| StoreError::backend(format!("column name '{column}' is too long")))?;
    let mut stored = Vec::with_capacity(1 + name.len() + key.len());
    stored.push(len);
    stored.extend_from_slice(name);
    stored.extend_from_slice(key);
    Ok(stored)
}

impl Store for SledStore {
    fn get(&self, column: ColumnId, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let value = self.db.get(column_key(column, key)?).map_err(backend)?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn put(&self, column: ColumnId, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        self.db
            .insert(column_key(column, &key)?, value)
            .map_err(backend)?;
        Ok(())
    }

    fn delete(&self, column: ColumnId, key: &[u8]) -> Result<(), StoreError> {
        self.db.remove(column_key(column, key)?).map_err(backend)?;
        Ok(())
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut sled_batch = Batch::default();
        let mut ops = 0usize;
        for op in batch.into_ops() {
            ops += 1;
            match op {
                BatchOp::Put { column, key, value } => {
                    sled_batch.insert(column_key(column, &key)?, value);
                }
                BatchOp::Delete { column, key } => {
                    sled_batch.remove(column_key(column, &key)?);
                }
            }
        }

        self.db.apply_batch(sled_batch).map_err(backend)?;
        self.db.flush().map_err(backend)?;
        debug!(ops, "sled batch applied");
        Ok(())
    }

    fn scan_prefix(
        &self,
        column: ColumnId,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let header = column_key(column, &[])?.len();
        self.db
            .scan_prefix(column_key(column, prefix)?)
            .map(|item| {
                let (key, value): (IVec, IVec) = item.map_err(backend)?;
                Ok((key[header..].to_vec(), value.to_vec()))
            })
            .collect()
    }
}
