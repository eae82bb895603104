//! Order store error types.

use common::OrderId;
use thiserror::Error;

use crate::status::OrderStatus;

/// Errors that can occur during order persistence operations.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// No order with the given identity exists.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The requested status change is not a valid transition.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// An order with this identity already exists.
    #[error("Order already exists: {0}")]
    AlreadyExists(OrderId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for order store results.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
