//! Infrastructure layer: in-memory stores, the transaction coordinator and
//! the order lifecycle services built on them.

pub mod services;
pub mod store;
pub mod tx;


pub use services::{OrderLifecycleManager, ProductService};
pub use store::{Access, InMemoryInventoryStore, InMemoryOrderStore, InventoryStore, OrderStore};
pub use tx::{TransactionCoordinator, Tx};
