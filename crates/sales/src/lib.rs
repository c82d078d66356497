//! Orders domain module.
//!
//! This crate contains the business rules for orders (validation, demand
//! aggregation, cancellation and partial returns), implemented purely as
//! deterministic domain logic (no IO, no locking, no storage).

pub mod order;

pub use order::{
    NewOrder, Order, OrderItem, OrderStatus, ProductQuantities, reconcile_return,
    validate_customer_name, validate_items,
};
