//! Transaction coordinator: whole-store exclusivity for units of work.
//!
//! There is no real database underneath, so a "transaction" is the exclusive
//! side of one process-wide `RwLock` over the product and order tables:
//!
//! ```text
//! run_exclusive(work)
//!   ↓
//! 1. Acquire the write lock (blocks readers and other units of work)
//!   ↓
//! 2. Hand `work` a `Tx` token (proof of exclusivity)
//!   ↓
//! 3. `work` reads/writes the stores with `tx.access()`
//!   ↓
//! 4. Release the lock, return `work`'s result unmodified
//! ```
//!
//! The coordinator does not roll anything back. Callers that need atomicity
//! must run every check before their first write (see
//! [`OrderLifecycleManager`](crate::services::OrderLifecycleManager)).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::store::{
    Access, HeldTables, InMemoryInventoryStore, InMemoryOrderStore, SharedTables, Tables,
};

/// Serializes units of work over the product and order tables.
#[derive(Debug, Default)]
pub struct TransactionCoordinator {
    tables: SharedTables,
    sequence: AtomicU64,
}

impl TransactionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Product store bound to this coordinator's tables.
    pub fn inventory(&self) -> InMemoryInventoryStore {
        InMemoryInventoryStore::new(Arc::clone(&self.tables))
    }

    /// Order store bound to this coordinator's tables.
    pub fn orders(&self) -> InMemoryOrderStore {
        InMemoryOrderStore::new(Arc::clone(&self.tables))
    }

    /// Run `work` with exclusive access to both stores.
    ///
    /// At most one unit of work runs at a time, system-wide. Acquisition has no
    /// timeout and a started unit of work is never interrupted. Writes made by
    /// `work` before it returns an error stay applied.
    pub fn run_exclusive<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Tx<'_>) -> Result<T, E>,
    {
        let mut guard = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let mut tx = Tx {
            tables: &mut *guard,
            sequence,
            started_at: Utc::now(),
        };

        debug!(tx = sequence, "unit of work started");
        let result = work(&mut tx);
        debug!(tx = sequence, ok = result.is_ok(), "unit of work finished");
        result
    }

    /// Number of units of work started so far.
    pub fn transactions_started(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

/// Token held by a running unit of work.
///
/// Owning a `Tx` means the exclusive lock is held; store calls made with
/// [`Tx::access`] skip their own locking.
#[derive(Debug)]
pub struct Tx<'a> {
    tables: &'a mut Tables,
    sequence: u64,
    started_at: DateTime<Utc>,
}

impl Tx<'_> {
    /// Store access that reuses the exclusivity held by this unit of work.
    pub fn access(&mut self) -> Access<'_> {
        Access::Held(HeldTables(&mut *self.tables))
    }

    /// Sequence number of this unit of work (1-based, process-wide).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Time the exclusive section was entered.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
