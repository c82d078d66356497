//! Application services over the stores.

pub mod orders;
pub mod products;

pub use orders::OrderLifecycleManager;
pub use products::ProductService;
