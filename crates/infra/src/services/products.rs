//! Product catalog maintenance.
//!
//! Plain CRUD over the inventory store. Each call locks for itself
//! (`Access::Acquire`); none of these operations opens a unit of work.

use tracing::{debug, info};

use stockroom_core::{DomainResult, ProductId};
use stockroom_products::{NewProduct, Product, ProductFilter, ProductPatch};

use crate::store::{Access, InMemoryInventoryStore, InventoryStore};

#[derive(Debug, Clone)]
pub struct ProductService<I = InMemoryInventoryStore> {
    inventory: I,
}

impl<I: InventoryStore> ProductService<I> {
    pub fn new(inventory: I) -> Self {
        Self { inventory }
    }

    pub fn create(&self, product: NewProduct) -> DomainResult<Product> {
        product.validate()?;
        let product = self.inventory.create(Access::Acquire, product)?;
        info!(product_id = %product.id, sku = %product.sku, stock = product.stock, "product created");
        Ok(product)
    }

    pub fn get(&self, id: ProductId) -> DomainResult<Product> {
        id.validate()?;
        self.inventory.get(Access::Acquire, id)
    }

    /// Replace every catalog field of an existing product.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> DomainResult<Product> {
        id.validate()?;
        patch.validate()?;
        let product = self.inventory.update(Access::Acquire, &patch.into_product(id))?;
        info!(product_id = %product.id, stock = product.stock, "product updated");
        Ok(product)
    }

    pub fn delete(&self, id: ProductId) -> DomainResult<()> {
        id.validate()?;
        self.inventory.delete(Access::Acquire, id)?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub fn list(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        filter.validate()?;
        let products = self.inventory.scan(Access::Acquire, filter)?;
        debug!(matched = products.len(), "products listed");
        Ok(products)
    }
}
