//! Order persistence trait.

use async_trait::async_trait;
use common::{OrderId, UserId};

use crate::error::Result;
use crate::order::Order;
use crate::status::OrderStatus;

/// Persistence for orders and their line items.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order, header and all line items as one unit.
    ///
    /// Either the whole order becomes durably visible or none of it
    /// does; a partially written order is never observable.
    async fn insert(&self, order: &Order) -> Result<()>;

    /// Loads an order by ID. Returns `None` if it does not exist.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Returns the buyer's orders, newest first.
    async fn orders_for_buyer(&self, buyer_id: UserId) -> Result<Vec<Order>>;

    /// Returns orders containing at least one of the seller's products,
    /// newest first.
    async fn orders_for_seller(&self, seller_id: UserId) -> Result<Vec<Order>>;

    /// Applies a status transition and returns the updated order.
    ///
    /// Fails with [`OrderStoreError::InvalidStatusTransition`] when the
    /// order's current status does not allow the change.
    ///
    /// [`OrderStoreError::InvalidStatusTransition`]: crate::error::OrderStoreError::InvalidStatusTransition
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order>;
}
