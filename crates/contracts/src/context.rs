//! Invocation runtime shared by the contracts.

use std::mem;

use neofs_primitives::PublicKey;
use neofs_store::{ColumnId, Overlay, Store};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::ContractResult;
use crate::notification::Notification;
use crate::record;

/// Host-supplied facts about a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Block height the invocation executes at.
    pub height: u64,
    /// Keys whose witnesses the host has already verified.
    pub signers: Vec<PublicKey>,
}

impl Invocation {
    pub fn at(height: u64) -> Self {
        Self {
            height,
            signers: Vec::new(),
        }
    }

    pub fn signed_by(mut self, key: PublicKey) -> Self {
        if !self.signers.contains(&key) {
            self.signers.push(key);
        }
        self
    }
}

/// State visible to an entry point while it runs.
///
/// Storage access goes through the invocation's overlay, so writes become
/// visible to later reads of the same invocation but reach the backend only
/// once the entry point returns `Ok`.
pub struct ExecutionContext<'a> {
    store: &'a dyn Store,
    height: u64,
    signers: Vec<PublicKey>,
    log: Vec<String>,
    notifications: Vec<Notification>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(store: &'a dyn Store, invocation: &Invocation) -> Self {
        Self {
            store,
            height: invocation.height,
            signers: invocation.signers.clone(),
            log: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn signers(&self) -> &[PublicKey] {
        &self.signers
    }

    /// Returns true when `key` signed the invocation.
    pub fn check_witness(&self, key: &PublicKey) -> bool {
        self.signers.contains(key)
    }

    pub fn load<T: DeserializeOwned>(
        &self,
        column: ColumnId,
        key: &[u8],
    ) -> ContractResult<Option<T>> {
        record::load(self.store, column, key)
    }

    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        column: ColumnId,
        key: &[u8],
    ) -> ContractResult<T> {
        record::load_or_default(self.store, column, key)
    }

    pub fn save<T: Serialize>(
        &mut self,
        column: ColumnId,
        key: &[u8],
        value: &T,
    ) -> ContractResult<()> {
        record::save(self.store, column, key, value)
    }

    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }

    pub fn logs(&self) -> &[String] {
        &self.log
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn drain_logs(&mut self) -> Vec<String> {
        mem::take(&mut self.log)
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        mem::take(&mut self.notifications)
    }
}

/// Everything a committed invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt<T> {
    pub value: T,
    pub logs: Vec<String>,
    pub notifications: Vec<Notification>,
    /// Number of storage operations committed.
    pub writes: usize,
}

/// Runs `entry` against `backend` as one atomic invocation.
///
/// The entry point sees a write-buffering overlay. Its writes are committed
/// in a single batch when it returns `Ok`; on `Err` they are dropped along
/// with any logs and notifications.
pub fn invoke<T, F>(
    backend: &dyn Store,
    invocation: &Invocation,
    entry: F,
) -> ContractResult<Receipt<T>>
where
    F: FnOnce(&mut ExecutionContext<'_>) -> ContractResult<T>,
{
    let overlay = Overlay::new(backend);
    let (value, logs, notifications) = {
        let mut ctx = ExecutionContext::new(&overlay, invocation);
        let value = entry(&mut ctx)?;
        (value, ctx.drain_logs(), ctx.drain_notifications())
    };
    let writes = overlay.commit()?;
    debug!(
        height = invocation.height,
        writes,
        notifications = notifications.len(),
        "invocation committed"
    );
    Ok(Receipt {
        value,
        logs,
        notifications,
        writes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContractError;
    use neofs_store::{MemoryStore, StoreExt};

    const COLUMN: ColumnId = ColumnId::new("test");

    fn key(b: u8) -> PublicKey {
        let mut bytes = [b; 33];
        bytes[0] = 0x02;
        PublicKey::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn commits_on_success() {
        let store = MemoryStore::new();
        let receipt = invoke(&store, &Invocation::at(7), |ctx| {
            let height = ctx.height();
            ctx.save(COLUMN, b"counter", &height)?;
            ctx.push_log("saved");
            Ok(height)
        })
        .unwrap();

        assert_eq!(receipt.value, 7);
        assert_eq!(receipt.writes, 1);
        assert_eq!(receipt.logs, vec!["saved".to_string()]);
        assert!(store.contains(COLUMN, b"counter").unwrap());
    }

    #[test]
    fn drops_writes_on_error() {
        let store = MemoryStore::new();
        let result: ContractResult<Receipt<()>> = invoke(&store, &Invocation::at(1), |ctx| {
            ctx.save(COLUMN, b"counter", &1u64)?;
            ctx.notify(Notification::NewEpoch { epoch: 1 });
            Err(ContractError::invalid_argument("test", "boom"))
        });

        assert!(result.is_err());
        assert!(!store.contains(COLUMN, b"counter").unwrap());
    }

    #[test]
    fn reads_see_own_writes() {
        let store = MemoryStore::new();
        let receipt = invoke(&store, &Invocation::at(1), |ctx| {
            ctx.save(COLUMN, b"n", &41u64)?;
            let n: u64 = ctx.load_or_default(COLUMN, b"n")?;
            Ok(n + 1)
        })
        .unwrap();
        assert_eq!(receipt.value, 42);
    }

    #[test]
    fn witness_check_uses_signers() {
        let invocation = Invocation::at(0).signed_by(key(1)).signed_by(key(1));
        assert_eq!(invocation.signers.len(), 1);

        let store = MemoryStore::new();
        let ctx = ExecutionContext::new(&store, &invocation);
        assert!(ctx.check_witness(&key(1)));
        assert!(!ctx.check_witness(&key(2)));
    }
}
