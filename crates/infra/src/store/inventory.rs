use std::sync::Arc;

use stockroom_core::{DomainResult, ProductId};
use stockroom_products::{NewProduct, Product, ProductFilter};

use super::{Access, SharedTables, with_read, with_write};

/// Keyed storage of product records.
///
/// `get` returns an owned copy: changing it has no effect until it is passed
/// back through `update`.
pub trait InventoryStore: Send + Sync {
    /// Store a new product under the next identifier.
    fn create(&self, access: Access<'_>, product: NewProduct) -> DomainResult<Product>;
    fn get(&self, access: Access<'_>, id: ProductId) -> DomainResult<Product>;
    /// Overwrite an existing product (`NotFound` if absent).
    fn update(&self, access: Access<'_>, product: &Product) -> DomainResult<Product>;
    fn delete(&self, access: Access<'_>, id: ProductId) -> DomainResult<()>;
    /// Products matching `filter`, ordered by identifier.
    fn scan(&self, access: Access<'_>, filter: &ProductFilter) -> DomainResult<Vec<Product>>;
}

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn create(&self, access: Access<'_>, product: NewProduct) -> DomainResult<Product> {
        (**self).create(access, product)
    }

    fn get(&self, access: Access<'_>, id: ProductId) -> DomainResult<Product> {
        (**self).get(access, id)
    }

    fn update(&self, access: Access<'_>, product: &Product) -> DomainResult<Product> {
        (**self).update(access, product)
    }

    fn delete(&self, access: Access<'_>, id: ProductId) -> DomainResult<()> {
        (**self).delete(access, id)
    }

    fn scan(&self, access: Access<'_>, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        (**self).scan(access, filter)
    }
}

/// In-memory product store over the coordinator's shared tables.
#[derive(Debug, Clone)]
pub struct InMemoryInventoryStore {
    tables: SharedTables,
}

impl InMemoryInventoryStore {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn create(&self, access: Access<'_>, product: NewProduct) -> DomainResult<Product> {
        with_write(&self.tables, access, |t| {
            let id = ProductId(t.products.next_id());
            Ok(t.products.insert(product.into_product(id)))
        })
    }

    fn get(&self, access: Access<'_>, id: ProductId) -> DomainResult<Product> {
        with_read(&self.tables, access, |t| t.products.get(id))
    }

    fn update(&self, access: Access<'_>, product: &Product) -> DomainResult<Product> {
        with_write(&self.tables, access, |t| t.products.replace(product.clone()))
    }

    fn delete(&self, access: Access<'_>, id: ProductId) -> DomainResult<()> {
        with_write(&self.tables, access, |t| t.products.remove(id).map(|_| ()))
    }

    fn scan(&self, access: Access<'_>, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        with_read(&self.tables, access, |t| {
            Ok(t.products
                .values()
                .filter(|p| filter.matches(p))
                .cloned()
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DomainError;

    use crate::tx::TransactionCoordinator;

    fn store() -> InMemoryInventoryStore {
        TransactionCoordinator::new().inventory()
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let store = store();
        let a = store
            .create(Access::Acquire, NewProduct::new("A", "SKU1", 10, 5))
            .unwrap();
        let b = store
            .create(Access::Acquire, NewProduct::new("B", "SKU2", 20, 2))
            .unwrap();
        assert_eq!(a.id, ProductId(1));
        assert_eq!(b.id, ProductId(2));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        let a = store
            .create(Access::Acquire, NewProduct::new("A", "SKU1", 10, 5))
            .unwrap();
        store.delete(Access::Acquire, a.id).unwrap();
        let b = store
            .create(Access::Acquire, NewProduct::new("B", "SKU2", 10, 5))
            .unwrap();
        assert_eq!(b.id, ProductId(2));
    }

    #[test]
    fn get_returns_a_detached_copy() {
        let store = store();
        let created = store
            .create(Access::Acquire, NewProduct::new("A", "SKU1", 10, 5))
            .unwrap();

        let mut copy = store.get(Access::Acquire, created.id).unwrap();
        copy.stock = 0;
        assert_eq!(store.get(Access::Acquire, created.id).unwrap().stock, 5);

        store.update(Access::Acquire, &copy).unwrap();
        assert_eq!(store.get(Access::Acquire, created.id).unwrap().stock, 0);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let store = store();
        let ghost = NewProduct::new("A", "SKU1", 10, 5).into_product(ProductId(99));
        let not_found = DomainError::not_found("product", 99);
        assert_eq!(store.get(Access::Acquire, ProductId(99)), Err(not_found.clone()));
        assert_eq!(store.update(Access::Acquire, &ghost), Err(not_found.clone()));
        assert_eq!(store.delete(Access::Acquire, ProductId(99)), Err(not_found));
    }

    #[test]
    fn scan_filters_by_name_and_price() {
        let store = store();
        for (name, price) in [("Aspirin", 100), ("Ibuprofen", 250), ("aspirin forte", 400)] {
            store
                .create(Access::Acquire, NewProduct::new(name, "SKU", price, 1))
                .unwrap();
        }

        let names = |filter: ProductFilter| -> Vec<String> {
            store
                .scan(Access::Acquire, &filter)
                .unwrap()
                .into_iter()
                .map(|p| p.name)
                .collect()
        };

        assert_eq!(names(ProductFilter::all()).len(), 3);
        assert_eq!(
            names(ProductFilter::all().name_contains("ASPIRIN")),
            vec!["Aspirin", "aspirin forte"]
        );
        assert_eq!(
            names(ProductFilter::all().price_between(Some(100), Some(250))),
            vec!["Aspirin", "Ibuprofen"]
        );
        assert_eq!(
            names(ProductFilter::all().name_contains("aspirin").price_between(Some(101), None)),
            vec!["aspirin forte"]
        );
    }

    #[test]
    fn held_access_reads_and_writes_without_relocking() {
        let coordinator = TransactionCoordinator::new();
        let store = coordinator.inventory();
        let created = store
            .create(Access::Acquire, NewProduct::new("A", "SKU1", 10, 5))
            .unwrap();

        let stock = coordinator
            .run_exclusive(|tx| {
                let mut p = store.get(tx.access(), created.id)?;
                p.withdraw(2)?;
                store.update(tx.access(), &p)?;
                store.get(tx.access(), created.id).map(|p| p.stock)
            })
            .unwrap();
        assert_eq!(stock, 3);
    }
}
