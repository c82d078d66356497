//! Products domain module.
//!
//! Catalog records and the stock rules that apply to them, implemented purely
//! as deterministic domain logic (no IO, no locking, no storage).

pub mod product;

pub use product::{NewProduct, Product, ProductFilter, ProductPatch};
