use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};
use tokio::sync::RwLock;

use crate::error::{OrderStoreError, Result};
use crate::order::Order;
use crate::status::OrderStatus;
use crate::store::OrderStore;

/// In-memory order store implementation.
///
/// Inserts the whole order under one write lock, matching the
/// all-or-nothing contract of the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

fn sorted_newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    orders
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id()) {
            return Err(OrderStoreError::AlreadyExists(order.id()));
        }
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn orders_for_buyer(&self, buyer_id: UserId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(sorted_newest_first(
            orders
                .values()
                .filter(|o| o.buyer_id() == buyer_id)
                .cloned()
                .collect(),
        ))
    }

    async fn orders_for_seller(&self, seller_id: UserId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(sorted_newest_first(
            orders
                .values()
                .filter(|o| o.involves_seller(seller_id))
                .cloned()
                .collect(),
        ))
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(OrderStoreError::NotFound(id))?;

        if !order.status().can_transition_to(status) {
            return Err(OrderStoreError::InvalidStatusTransition {
                from: order.status(),
                to: status,
            });
        }

        order.set_status(status);
        Ok(order.clone())
    }
}
