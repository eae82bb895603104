use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use tokio::sync::RwLock;

use crate::error::{CatalogError, Result};
use crate::product::{Product, Version};
use crate::store::ProductCatalog;

/// In-memory catalog implementation.
///
/// Provides the same conditional-write semantics as the PostgreSQL
/// implementation: the version check and the decrement happen under one
/// write lock, so at most one writer per observed version can win.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a product listing.
    pub async fn add_product(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    /// Returns the current stock of a product, if it exists.
    pub async fn stock_of(&self, id: ProductId) -> Option<u32> {
        self.products.read().await.get(&id).map(|p| p.stock)
    }

    /// Returns the current version of a product, if it exists.
    pub async fn version_of(&self, id: ProductId) -> Option<Version> {
        self.products.read().await.get(&id).map(|p| p.version)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn product(&self, id: ProductId) -> Result<Product> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn decrement_stock(
        &self,
        id: ProductId,
        amount: u32,
        expected_version: Version,
    ) -> Result<Version> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;

        if product.version != expected_version {
            return Err(CatalogError::Conflict {
                product_id: id,
                expected: expected_version,
                actual: product.version,
            });
        }

        if product.stock < amount {
            return Err(CatalogError::InsufficientStock {
                product_id: id,
                requested: amount,
                available: product.stock,
            });
        }

        product.stock -= amount;
        product.version = product.version.next();
        Ok(product.version)
    }

    async fn restore_stock(&self, id: ProductId, amount: u32) -> Result<Version> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;

        product.stock += amount;
        product.version = product.version.next();
        Ok(product.version)
    }
}
