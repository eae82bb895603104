//! Checkout error types.

use catalog::CatalogError;
use common::{ProductId, UserId};
use orders::OrderStoreError;
use thiserror::Error;

/// Errors that can abort a placement attempt or fail a lookup.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The buyer placing the order does not exist.
    #[error("Buyer not found: {0}")]
    BuyerNotFound(UserId),

    /// A requested product does not exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Stock does not cover a requested quantity.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// A concurrent placement won the race for the same product.
    #[error("Product {0} was modified concurrently")]
    ConcurrentModification(ProductId),

    /// The request carried no line items.
    #[error("Order has no items")]
    NoItems,

    /// A line item requested zero units.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: u32,
    },

    /// A line item carried a non-positive unit price.
    #[error("Invalid unit price for product {0}")]
    InvalidPrice(ProductId),

    /// Catalog failure outside the expected race outcomes.
    #[error(transparent)]
    Catalog(CatalogError),

    /// Order store failure.
    #[error(transparent)]
    Store(#[from] OrderStoreError),
}

// Race outcomes from the catalog map to checkout-level errors so callers
// see placement semantics, not storage internals.
impl From<CatalogError> for CheckoutError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => CheckoutError::ProductNotFound(id),
            CatalogError::InsufficientStock {
                product_id,
                requested,
                available,
            } => CheckoutError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            CatalogError::Conflict { product_id, .. } => {
                CheckoutError::ConcurrentModification(product_id)
            }
            other => CheckoutError::Catalog(other),
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
