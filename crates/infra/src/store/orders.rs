use std::sync::Arc;

use chrono::Utc;

use stockroom_core::{DomainResult, OrderId};
use stockroom_sales::{NewOrder, Order};

use super::{Access, SharedTables, with_read, with_write};

/// Keyed storage of order records.
pub trait OrderStore: Send + Sync {
    /// Store a new order under the next identifier.
    ///
    /// `created_at` and `updated_at` both take the draft's `placed_at`.
    fn create(&self, access: Access<'_>, order: NewOrder) -> DomainResult<Order>;
    fn get(&self, access: Access<'_>, id: OrderId) -> DomainResult<Order>;
    /// Overwrite an existing order, stamping a fresh `updated_at`.
    fn update(&self, access: Access<'_>, order: &Order) -> DomainResult<Order>;
    /// All orders, ordered by identifier.
    fn list(&self, access: Access<'_>) -> DomainResult<Vec<Order>>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn create(&self, access: Access<'_>, order: NewOrder) -> DomainResult<Order> {
        (**self).create(access, order)
    }

    fn get(&self, access: Access<'_>, id: OrderId) -> DomainResult<Order> {
        (**self).get(access, id)
    }

    fn update(&self, access: Access<'_>, order: &Order) -> DomainResult<Order> {
        (**self).update(access, order)
    }

    fn list(&self, access: Access<'_>) -> DomainResult<Vec<Order>> {
        (**self).list(access)
    }
}

/// In-memory order store over the coordinator's shared tables.
#[derive(Debug, Clone)]
pub struct InMemoryOrderStore {
    tables: SharedTables,
}

impl InMemoryOrderStore {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

impl OrderStore for InMemoryOrderStore {
    fn create(&self, access: Access<'_>, order: NewOrder) -> DomainResult<Order> {
        with_write(&self.tables, access, |t| {
            let id = OrderId(t.orders.next_id());
            Ok(t.orders.insert(order.into_order(id)))
        })
    }

    fn get(&self, access: Access<'_>, id: OrderId) -> DomainResult<Order> {
        with_read(&self.tables, access, |t| t.orders.get(id))
    }

    fn update(&self, access: Access<'_>, order: &Order) -> DomainResult<Order> {
        let mut order = order.clone();
        order.updated_at = Utc::now();
        with_write(&self.tables, access, |t| t.orders.replace(order))
    }

    fn list(&self, access: Access<'_>) -> DomainResult<Vec<Order>> {
        with_read(&self.tables, access, |t| Ok(t.orders.values().cloned().collect()))
    }
}
