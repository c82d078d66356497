use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, OrderId, ProductId};

/// Order status lifecycle.
///
/// Orders are created directly as `Confirmed`; `Pending` is reserved for
/// flows that place an order before reserving stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Order line: product and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl OrderItem {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.product_id.validate()?;
        if self.quantity <= 0 {
            return Err(DomainError::invalid_input(format!(
                "quantity for product {} must be positive (got {})",
                self.product_id, self.quantity
            )));
        }
        Ok(())
    }
}

/// Validate a caller-supplied list of lines (order items or return items).
///
/// Besides each line on its own, the per-product sums must fit in an `i64`.
pub fn validate_items(items: &[OrderItem], what: &str) -> DomainResult<()> {
    if items.is_empty() {
        return Err(DomainError::invalid_input(format!("{what} cannot be empty")));
    }
    items.iter().try_for_each(OrderItem::validate)?;
    ProductQuantities::from_items(items).map(|_| ())
}

/// Any non-empty name is accepted, whitespace included.
pub fn validate_customer_name(customer_name: &str) -> DomainResult<()> {
    if customer_name.is_empty() {
        return Err(DomainError::invalid_input("customer_name cannot be empty"));
    }
    Ok(())
}

/// Per-product quantity tally, ordered by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuantities(BTreeMap<ProductId, i64>);

impl ProductQuantities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum line quantities per distinct product.
    pub fn from_items(items: &[OrderItem]) -> DomainResult<Self> {
        let mut tally = Self::new();
        for item in items {
            tally.add(item.product_id, item.quantity)?;
        }
        Ok(tally)
    }

    /// Add to a product's tally; a sum that does not fit is invalid input.
    pub fn add(&mut self, product_id: ProductId, quantity: i64) -> DomainResult<()> {
        let entry = self.0.entry(product_id).or_insert(0);
        *entry = entry.checked_add(quantity).ok_or_else(|| {
            DomainError::invalid_input(format!("total quantity for product {product_id} overflows"))
        })?;
        Ok(())
    }

    /// Quantity recorded for `product_id` (zero when absent).
    pub fn get(&self, product_id: ProductId) -> i64 {
        self.0.get(&product_id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductId, i64)> + '_ {
        self.0.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over all products; widened so it cannot overflow.
    pub fn total(&self) -> i128 {
        self.0.values().map(|qty| i128::from(*qty)).sum()
    }
}

/// Fields of an order that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// Becomes both `created_at` and `updated_at`.
    pub placed_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn confirmed(
        customer_name: impl Into<String>,
        items: Vec<OrderItem>,
        placed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            items,
            status: OrderStatus::Confirmed,
            placed_at,
        }
    }

    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            customer_name: self.customer_name,
            items: self.items,
            status: self.status,
            created_at: self.placed_at,
            updated_at: self.placed_at,
        }
    }
}

/// Order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Order {
    type Id = OrderId;

    const KIND: &'static str = "order";

    fn id(&self) -> OrderId {
        self.id
    }
}

impl Order {
    fn ensure_confirmed(&self, action: &str) -> DomainResult<()> {
        if self.status != OrderStatus::Confirmed {
            return Err(DomainError::invalid_state(format!(
                "cannot {action} order {} in status {:?}",
                self.id, self.status
            )));
        }
        Ok(())
    }

    /// Quantity currently held by this order, summed per product.
    pub fn held_quantities(&self) -> DomainResult<ProductQuantities> {
        ProductQuantities::from_items(&self.items)
    }

    /// Cancel a confirmed order.
    ///
    /// Returns the stock to give back, per product. The order is left
    /// untouched when the status does not allow cancelling.
    pub fn cancel(&mut self) -> DomainResult<ProductQuantities> {
        self.ensure_confirmed("cancel")?;
        let restock = self.held_quantities()?;
        self.status = OrderStatus::Cancelled;
        Ok(restock)
    }

    /// Take back part of a confirmed order.
    ///
    /// Returns the stock to give back, per product. Nothing changes unless
    /// every requested quantity is covered by what the order holds.
    pub fn partial_return(&mut self, returns: &[OrderItem]) -> DomainResult<ProductQuantities> {
        self.ensure_confirmed("return items from")?;

        let held = self.held_quantities()?;
        let requested = ProductQuantities::from_items(returns)?;
        for (product_id, qty) in requested.iter() {
            let holding = held.get(product_id);
            if qty > holding {
                return Err(DomainError::invalid_input(format!(
                    "cannot return {qty} of product {product_id}: order {} holds {holding}",
                    self.id
                )));
            }
        }

        let (remaining, restored) = reconcile_return(&self.items, &requested)?;
        self.items = remaining;
        Ok(restored)
    }
}

/// Remove returned quantities from `items`, left to right.
///
/// Each product's requested total is consumed greedily from its lines in
/// order: a line is shrunk when it covers the rest of the request, dropped
/// when it is used up, and any shortfall carries to the next line of the same
/// product. Returns the rebuilt lines and the quantity restored per product.
///
/// Callers must ensure `returns` never exceeds what `items` hold.
pub fn reconcile_return(
    items: &[OrderItem],
    returns: &ProductQuantities,
) -> DomainResult<(Vec<OrderItem>, ProductQuantities)> {
    let mut consumed = ProductQuantities::new();
    let mut remaining = Vec::with_capacity(items.len());

    for item in items {
        let total_return = returns.get(item.product_id);
        let already = consumed.get(item.product_id);
        if already >= total_return {
            remaining.push(item.clone());
            continue;
        }

        let need = total_return - already;
        let available = item.quantity;
        match need.cmp(&available) {
            Ordering::Less => {
                remaining.push(OrderItem {
                    product_id: item.product_id,
                    quantity: available - need,
                });
                consumed.add(item.product_id, need)?;
            }
            // Line used up; a larger need carries over to the next line.
            Ordering::Equal | Ordering::Greater => {
                consumed.add(item.product_id, available)?;
            }
        }
    }

    Ok((remaining, consumed))
}
