use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId};

/// Product record: catalog data plus on-hand stock.
///
/// `stock` never goes negative between operations; all changes go through
/// [`Product::withdraw`] and [`Product::restock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub stock: i64,
}

impl Entity for Product {
    type Id = ProductId;

    const KIND: &'static str = "product";

    fn id(&self) -> ProductId {
        self.id
    }
}

impl Product {
    /// Whether `quantity` units can be taken from stock right now.
    pub fn can_supply(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }

    /// Take `quantity` units out of stock.
    pub fn withdraw(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::invalid_input("quantity must be positive"));
        }
        if !self.can_supply(quantity) {
            return Err(DomainError::not_enough_stock(self.id, quantity, self.stock));
        }
        self.stock -= quantity;
        Ok(())
    }

    /// Put `quantity` units back into stock.
    pub fn restock(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::invalid_input("quantity must be positive"));
        }
        self.stock = self
            .stock
            .checked_add(quantity)
            .ok_or_else(|| DomainError::invalid_input("stock overflow"))?;
        Ok(())
    }
}

/// Fields of a product that does not exist yet (identifier is store-assigned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price: u64,
    pub stock: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, sku: impl Into<String>, price: u64, stock: i64) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            price,
            stock,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_input("name cannot be empty"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::invalid_input("sku cannot be empty"));
        }
        if self.stock < 0 {
            return Err(DomainError::invalid_input("stock cannot be negative"));
        }
        Ok(())
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            sku: self.sku,
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Full replacement of a product's catalog fields.
///
/// Unlike creation, an empty SKU is accepted on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub price: u64,
    pub stock: i64,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_input("name cannot be empty"));
        }
        if self.stock < 0 {
            return Err(DomainError::invalid_input("stock cannot be negative"));
        }
        Ok(())
    }

    /// The replacement record for product `id`.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            sku: self.sku,
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Listing filter: case-insensitive name substring and inclusive price bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub name_contains: Option<String>,
    #[serde(default)]
    pub min_price: Option<u64>,
    #[serde(default)]
    pub max_price: Option<u64>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    pub fn price_between(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(DomainError::invalid_input(format!(
                    "min_price ({min}) is greater than max_price ({max})"
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = self.name_contains.as_deref() {
            if !needle.is_empty()
                && !product.name.to_lowercase().contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }
}
