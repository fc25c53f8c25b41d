use dashmap::DashMap;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::traits::{BatchOp, ColumnId, Store, WriteBatch};

/// Volatile store used by tests and the replay tool.
///
/// Batches are applied under an exclusive commit lock, so readers never
/// observe half of a batch.
#[derive(Default)]
pub struct MemoryStore {
    columns: DashMap<ColumnId, DashMap<Vec<u8>, Vec<u8>>>,
    commit: RwLock<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: &[ColumnId]) -> Self {
        let store = Self::new();
        for column in columns {
            store.create_column(*column);
        }
        store
    }

    pub fn create_column(&self, column: ColumnId) {
        self.columns.entry(column).or_insert_with(DashMap::new);
    }

    /// Number of entries held in `column`.
    pub fn len(&self, column: ColumnId) -> usize {
        self.columns
            .get(&column)
            .map(|col| col.value().len())
            .unwrap_or(0)
    }

    fn put_unlocked(&self, column: ColumnId, key: Vec<u8>, value: Vec<u8>) {
        self.columns
            .entry(column)
            .or_insert_with(DashMap::new)
            .value()
            .insert(key, value);
    }

    fn delete_unlocked(&self, column: ColumnId, key: &[u8]) {
        if let Some(col) = self.columns.get(&column) {
            col.value().remove(key);
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, column: ColumnId, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let _guard = self.commit.read();
        if let Some(col) = self.columns.get(&column) {
            Ok(col.value().get(key).map(|value| value.value().clone()))
        } else {
            Ok(None)
        }
    }

    fn put(&self, column: ColumnId, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        let _guard = self.commit.write();
        self.put_unlocked(column, key, value);
        Ok(())
    }

    fn delete(&self, column: ColumnId, key: &[u8]) -> Result<(), StoreError> {
        let _guard = self.commit.write();
        self.delete_unlocked(column, key);
        Ok(())
    }

    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let _guard = self.commit.write();
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { column, key, value } => {
                    self.put_unlocked(column, key, value);
                }
                BatchOp::Delete { column, key } => {
                    self.delete_unlocked(column, key.as_slice());
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
        let _guard = self.commit.read();
        if let Some(col) = self.columns.get(&column) {
            let mut entries: Vec<(Vec<u8>, Vec<u8>)> = col
                .value()
                .iter()
                .filter_map(|kv| {
                    let key = kv.key();
                    if key.starts_with(prefix) {
                        Some((key.clone(), kv.value().clone()))
                    } else {
                        None
                    }
                })
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(entries)
        } else {
            Ok(Vec::new())
        }
    }
}
