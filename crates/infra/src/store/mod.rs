//! Keyed record storage for products and orders.
//!
//! Both stores are views over one set of tables guarded by a single
//! `RwLock` owned by the [`TransactionCoordinator`](crate::tx::TransactionCoordinator).
//!
//! ## Locking discipline
//!
//! Every store operation takes an [`Access`] argument:
//!
//! - [`Access::Acquire`]: the caller holds nothing; the store takes the shared
//!   lock for reads and the exclusive lock for writes.
//! - [`Access::Held`]: the caller is inside a unit of work and already holds
//!   exclusivity (obtained through [`Tx::access`](crate::tx::Tx::access)); the
//!   store uses the tables directly and never locks again. The
//!   [`HeldTables`] inside can only be produced by a running
//!   [`Tx`](crate::tx::Tx).

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use stockroom_core::{DomainError, DomainResult, Entity};
use stockroom_products::Product;
use stockroom_sales::Order;

pub mod inventory;
pub mod orders;

pub use inventory::{InMemoryInventoryStore, InventoryStore};
pub use orders::{InMemoryOrderStore, OrderStore};

/// How a store operation reaches the tables.
#[derive(Debug)]
pub enum Access<'t> {
    /// Lock for the duration of this single operation.
    Acquire,
    /// Exclusivity is already held by the caller.
    Held(HeldTables<'t>),
}

/// Tables borrowed from a running unit of work.
///
/// The field is private to this crate, so code outside it cannot build an
/// `Access::Held` from tables of its own:
///
/// ```compile_fail
/// use stockroom_infra::store::{Access, HeldTables};
///
/// fn forged<'t>() -> Access<'t> {
///     Access::Held(HeldTables(unimplemented!()))
/// }
/// ```
#[derive(Debug)]
pub struct HeldTables<'t>(pub(crate) &'t mut Tables);

/// The record tables shared by both stores.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) products: Table<Product>,
    pub(crate) orders: Table<Order>,
}

pub(crate) type SharedTables = Arc<RwLock<Tables>>;

/// Rows of one entity type plus its identifier sequence.
#[derive(Debug)]
pub(crate) struct Table<E: Entity> {
    rows: BTreeMap<E::Id, E>,
    last_id: i64,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<E> Table<E>
where
    E: Entity + Clone,
{
    /// Identifiers start at 1 and are never reused, even after deletes.
    pub(crate) fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub(crate) fn get(&self, id: E::Id) -> DomainResult<E> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(E::KIND, id))
    }

    pub(crate) fn insert(&mut self, row: E) -> E {
        self.rows.insert(row.id(), row.clone());
        row
    }

    pub(crate) fn replace(&mut self, row: E) -> DomainResult<E> {
        let slot = self
            .rows
            .get_mut(&row.id())
            .ok_or_else(|| DomainError::not_found(E::KIND, row.id()))?;
        *slot = row.clone();
        Ok(row)
    }

    pub(crate) fn remove(&mut self, id: E::Id) -> DomainResult<E> {
        self.rows
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(E::KIND, id))
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }
}

/// Run a read against the tables, taking the shared lock unless already held.
///
/// A poisoned lock is recovered: units of work commit only after every check
/// has passed, so a panic never leaves half-applied writes behind.
pub(crate) fn with_read<T>(
    shared: &RwLock<Tables>,
    access: Access<'_>,
    f: impl FnOnce(&Tables) -> T,
) -> T {
    match access {
        Access::Held(HeldTables(tables)) => f(tables),
        Access::Acquire => {
            let guard = shared.read().unwrap_or_else(PoisonError::into_inner);
            f(&guard)
        }
    }
}

/// Run a write against the tables, taking the exclusive lock unless already held.
pub(crate) fn with_write<T>(
    shared: &RwLock<Tables>,
    access: Access<'_>,
    f: impl FnOnce(&mut Tables) -> T,
) -> T {
    match access {
        Access::Held(HeldTables(tables)) => f(tables),
        Access::Acquire => {
            let mut guard = shared.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        }
    }
}
