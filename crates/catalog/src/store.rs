//! The catalog trait: the only mutation surface for product stock.

use async_trait::async_trait;
use common::ProductId;

use crate::error::Result;
use crate::product::{Product, Version};

/// Read and conditional-write access to versioned product records.
///
/// `decrement_stock` is a compare-and-swap: the write commits only if
/// the stored version still equals the version the caller observed when
/// it read the product. The gap between `product` and `decrement_stock`
/// is expected to race; correctness comes from the version guard at
/// write time, not from the read being fresh.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Returns the current product record, including stock and version.
    async fn product(&self, id: ProductId) -> Result<Product>;

    /// Decrements stock by `amount` if the stored version equals
    /// `expected_version` and stock covers `amount`.
    ///
    /// Returns the new version on success. Fails with
    /// [`CatalogError::Conflict`] on a version mismatch and
    /// [`CatalogError::InsufficientStock`] when stock at write time is
    /// short, both without modifying the record.
    ///
    /// [`CatalogError::Conflict`]: crate::error::CatalogError::Conflict
    /// [`CatalogError::InsufficientStock`]: crate::error::CatalogError::InsufficientStock
    async fn decrement_stock(
        &self,
        id: ProductId,
        amount: u32,
        expected_version: Version,
    ) -> Result<Version>;

    /// Adds `amount` back to stock, bumping the version.
    ///
    /// This is the compensation path for aborted placement attempts; it
    /// is unconditional because the units being returned were debited by
    /// the same attempt.
    async fn restore_stock(&self, id: ProductId, amount: u32) -> Result<Version>;
}
