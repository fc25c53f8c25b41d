//! Versioned persisted records.
//!
//! Every blob a contract stores is wrapped in an envelope carrying the
//! schema version it was written with, so a reader never has to guess how to
//! decode a value.

use neofs_store::{ColumnId, Store, StoreExt};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{ContractError, ContractResult};

/// Schema version written by this release.
pub const SCHEMA_VERSION: u8 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u8,
    body: T,
}

/// Loads the record stored under `key`, or `None` when absent.
pub fn load<T: DeserializeOwned>(
    store: &dyn Store,
    column: ColumnId,
    key: &[u8],
) -> ContractResult<Option<T>> {
    let envelope: Option<Envelope<T>> = store.get_decoded(column, key)?;
    match envelope {
        Some(envelope) if envelope.version == SCHEMA_VERSION => Ok(Some(envelope.body)),
        Some(envelope) => Err(ContractError::codec(format!(
            "{column}/{}: unsupported schema version {}",
            String::from_utf8_lossy(key),
            envelope.version
        ))),
        None => Ok(None),
    }
}

/// Loads the record under `key`, falling back to `T::default()`.
pub fn load_or_default<T: DeserializeOwned + Default>(
    store: &dyn Store,
    column: ColumnId,
    key: &[u8],
) -> ContractResult<T> {
    Ok(load(store, column, key)?.unwrap_or_default())
}

/// Stores `value` under `key`.
pub fn save<T: Serialize>(
    store: &dyn Store,
    column: ColumnId,
    key: &[u8],
    value: &T,
) -> ContractResult<()> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        body: value,
    };
    store.put_encoded(column, key, &envelope)?;
    Ok(())
}
