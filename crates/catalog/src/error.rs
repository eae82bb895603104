//! Catalog error types.

use common::ProductId;
use thiserror::Error;

use crate::product::Version;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with the given identity exists.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Stock at write time does not cover the requested amount.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The record's version no longer matches the writer's observed version.
    #[error("Concurrent update on product {product_id}: expected version {expected}, found {actual}")]
    Conflict {
        product_id: ProductId,
        expected: Version,
        actual: Version,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;
