//! Order lifecycle: placement, cancellation and partial returns.
//!
//! Every mutating operation is one unit of work on the
//! [`TransactionCoordinator`] and follows the same shape:
//!
//! ```text
//! validate input (no lock taken)
//!   ↓
//! run_exclusive:
//!   read order / products       (tx.access())
//!   decide on local copies      (pure domain logic)
//!   stage every write
//!   commit staged writes        (only reached when all checks passed)
//! ```
//!
//! The coordinator never rolls back, so nothing is written until the last
//! check of an operation has succeeded. A failure at any point leaves the
//! stores exactly as they were.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use stockroom_core::{DomainResult, OrderId};
use stockroom_products::Product;
use stockroom_sales::{
    NewOrder, Order, OrderItem, ProductQuantities, validate_customer_name, validate_items,
};

use crate::store::{Access, InMemoryInventoryStore, InMemoryOrderStore, InventoryStore, OrderStore};
use crate::tx::{TransactionCoordinator, Tx};

/// Order write waiting for commit.
#[derive(Debug)]
enum StagedOrder {
    Create(NewOrder),
    Update(Order),
}

/// Stock changes collected during a unit of work, applied only once every
/// check has passed.
#[derive(Debug, Default)]
struct StagedWrites {
    products: Vec<Product>,
}

impl StagedWrites {
    /// Apply the staged stock changes, then the order write.
    fn commit<I, O>(
        self,
        order: StagedOrder,
        inventory: &I,
        orders: &O,
        tx: &mut Tx<'_>,
    ) -> DomainResult<Order>
    where
        I: InventoryStore,
        O: OrderStore,
    {
        debug!(tx = tx.sequence(), products = self.products.len(), "committing staged writes");
        for product in &self.products {
            inventory.update(tx.access(), product)?;
        }
        match order {
            StagedOrder::Create(draft) => orders.create(tx.access(), draft),
            StagedOrder::Update(order) => orders.update(tx.access(), &order),
        }
    }
}

/// Order placement, cancellation and partial returns over the shared stores.
#[derive(Debug)]
pub struct OrderLifecycleManager<I = InMemoryInventoryStore, O = InMemoryOrderStore> {
    coordinator: Arc<TransactionCoordinator>,
    inventory: I,
    orders: O,
}

impl OrderLifecycleManager {
    /// Manager over the coordinator's own in-memory stores.
    pub fn new(coordinator: Arc<TransactionCoordinator>) -> Self {
        let inventory = coordinator.inventory();
        let orders = coordinator.orders();
        Self::with_stores(coordinator, inventory, orders)
    }
}

impl<I, O> OrderLifecycleManager<I, O>
where
    I: InventoryStore,
    O: OrderStore,
{
    pub fn with_stores(coordinator: Arc<TransactionCoordinator>, inventory: I, orders: O) -> Self {
        Self {
            coordinator,
            inventory,
            orders,
        }
    }

    /// Place an order, reserving stock for every line.
    ///
    /// Demand is summed per product before checking, so duplicate lines for
    /// one product are checked against their combined quantity. The stored
    /// order keeps the lines exactly as submitted.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub fn create_order(&self, customer_name: &str, items: Vec<OrderItem>) -> DomainResult<Order> {
        validate_customer_name(customer_name)?;
        validate_items(&items, "items")?;
        let demand = ProductQuantities::from_items(&items)?;

        let order = self.coordinator.run_exclusive(|tx| {
            let mut staged = StagedWrites::default();
            for (product_id, requested) in demand.iter() {
                let mut product = self.inventory.get(tx.access(), product_id)?;
                product.withdraw(requested).inspect_err(|e| {
                    warn!(product_id = %product_id, error = %e, "order rejected");
                })?;
                staged.products.push(product);
            }

            let draft = NewOrder::confirmed(customer_name, items, tx.started_at());
            staged.commit(StagedOrder::Create(draft), &self.inventory, &self.orders, tx)
        })?;

        info!(order_id = %order.id, products = demand.len(), units = demand.total(), "order created");
        Ok(order)
    }

    /// Fetch an order. Takes the shared lock only; no unit of work is opened.
    pub fn get_order(&self, order_id: OrderId) -> DomainResult<Order> {
        order_id.validate()?;
        self.orders.get(Access::Acquire, order_id)
    }

    /// All stored orders, ordered by identifier.
    pub fn list_orders(&self) -> DomainResult<Vec<Order>> {
        self.orders.list(Access::Acquire)
    }

    /// Cancel a confirmed order and give its stock back.
    #[instrument(skip(self))]
    pub fn cancel_order(&self, order_id: OrderId) -> DomainResult<Order> {
        order_id.validate()?;

        let order = self.coordinator.run_exclusive(|tx| {
            let mut order = self.orders.get(tx.access(), order_id)?;
            let restock = order.cancel().inspect_err(|e| {
                warn!(error = %e, "cancel rejected");
            })?;

            let staged = self.stage_restock(tx, &restock)?;
            staged.commit(StagedOrder::Update(order), &self.inventory, &self.orders, tx)
        })?;

        info!(order_id = %order.id, "order cancelled");
        Ok(order)
    }

    /// Take back part of a confirmed order.
    ///
    /// Quantities are removed from the order's lines left to right; the order
    /// stays confirmed even when no lines remain.
    #[instrument(skip(self, return_items), fields(lines = return_items.len()))]
    pub fn partial_return(
        &self,
        order_id: OrderId,
        return_items: Vec<OrderItem>,
    ) -> DomainResult<Order> {
        order_id.validate()?;
        validate_items(&return_items, "return items")?;

        let order = self.coordinator.run_exclusive(|tx| {
            let mut order = self.orders.get(tx.access(), order_id)?;
            let restock = order.partial_return(&return_items).inspect_err(|e| {
                warn!(error = %e, "return rejected");
            })?;

            let staged = self.stage_restock(tx, &restock)?;
            staged.commit(StagedOrder::Update(order), &self.inventory, &self.orders, tx)
        })?;

        info!(order_id = %order.id, remaining_lines = order.items.len(), "order partially returned");
        Ok(order)
    }

    /// Fetch every product to credit and stage its raised stock.
    fn stage_restock(&self, tx: &mut Tx<'_>, restock: &ProductQuantities) -> DomainResult<StagedWrites> {
        let mut staged = StagedWrites::default();
        for (product_id, quantity) in restock.iter() {
            let mut product = self.inventory.get(tx.access(), product_id)?;
            product.restock(quantity)?;
            staged.products.push(product);
        }
        Ok(staged)
    }
}
