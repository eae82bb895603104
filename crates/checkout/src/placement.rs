//! The placement orchestrator and its supporting request types.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use catalog::{Product, ProductCatalog, Version};
use common::{Money, OrderId, ProductId, UserId};
use notifications::{Mailer, NotificationCategory, NotificationStore};
use orders::{LineItem, Order, OrderStatus, OrderStore};
use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};
use crate::services::buyers::{Buyer, BuyerDirectory};

/// One requested line of a placement attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product_id: ProductId,
    /// Units requested. Must be positive.
    pub quantity: u32,
    /// Unit price the buyer saw when building the cart.
    pub unit_price: Money,
}

/// A full placement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub buyer_id: UserId,
    pub shipping_address: String,
    pub payment_method: String,
    /// Total as declared by the caller; stored as given.
    pub total: Money,
    pub items: Vec<LineItemRequest>,
}

/// Where a placement attempt currently is.
///
/// Phases advance strictly forward; `Aborted` can follow any phase up to
/// and including `Persisting`. Once persistence succeeds the attempt can
/// no longer abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPhase {
    Started,
    Validating,
    Reserving,
    Persisting,
    NotifyingSellers,
    DispatchingReceipt,
    Completed,
    Aborted,
}

impl PlacementPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementPhase::Started => "started",
            PlacementPhase::Validating => "validating",
            PlacementPhase::Reserving => "reserving",
            PlacementPhase::Persisting => "persisting",
            PlacementPhase::NotifyingSellers => "notifying_sellers",
            PlacementPhase::DispatchingReceipt => "dispatching_receipt",
            PlacementPhase::Completed => "completed",
            PlacementPhase::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for PlacementPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated line: the resolved product plus the request's quantity
/// and price snapshot.
struct ValidatedItem {
    product: Product,
    quantity: u32,
    unit_price: Money,
}

/// Tracks stock decrements applied so far so an aborting attempt can
/// restore them.
///
/// When one order names the same product twice, the second decrement
/// must use the version returned by the first, not the stale read from
/// validation; `versions` carries that chain.
struct Reservation<'a, C: ProductCatalog> {
    catalog: &'a C,
    applied: Vec<(ProductId, u32)>,
    versions: HashMap<ProductId, Version>,
}

impl<'a, C: ProductCatalog> Reservation<'a, C> {
    fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            applied: Vec::new(),
            versions: HashMap::new(),
        }
    }

    async fn decrement(&mut self, product: &Product, quantity: u32) -> Result<()> {
        let expected = self
            .versions
            .get(&product.id)
            .copied()
            .unwrap_or(product.version);
        let new_version = self
            .catalog
            .decrement_stock(product.id, quantity, expected)
            .await?;
        self.versions.insert(product.id, new_version);
        self.applied.push((product.id, quantity));
        Ok(())
    }

    /// Restores every applied decrement, newest first.
    ///
    /// Restore failures are logged and skipped; rollback keeps going so
    /// one bad product does not strand the rest of the stock.
    async fn roll_back(self) {
        for (product_id, quantity) in self.applied.into_iter().rev() {
            if let Err(error) = self.catalog.restore_stock(product_id, quantity).await {
                tracing::error!(
                    product_id = %product_id,
                    quantity,
                    %error,
                    "failed to restore stock during rollback"
                );
            }
        }
    }
}

/// Orchestrates order placement end to end.
///
/// Validation and reservation run before persistence; any failure up to
/// and including the order insert rolls back every stock decrement the
/// attempt applied. Seller notifications and the buyer receipt run after
/// the order is durable and are best-effort.
pub struct CheckoutService<C, O, N, M, B>
where
    C: ProductCatalog,
    O: OrderStore,
    N: NotificationStore,
    M: Mailer + 'static,
    B: BuyerDirectory,
{
    catalog: C,
    orders: O,
    notifications: N,
    mailer: Arc<M>,
    buyers: B,
}

impl<C, O, N, M, B> CheckoutService<C, O, N, M, B>
where
    C: ProductCatalog,
    O: OrderStore,
    N: NotificationStore,
    M: Mailer + 'static,
    B: BuyerDirectory,
{
    /// Creates a new checkout service.
    pub fn new(catalog: C, orders: O, notifications: N, mailer: Arc<M>, buyers: B) -> Self {
        Self {
            catalog,
            orders,
            notifications,
            mailer,
            buyers,
        }
    }

    /// Runs a placement attempt and returns the persisted order.
    #[tracing::instrument(skip(self, request), fields(buyer_id = %request.buyer_id))]
    pub async fn place_order(&self, request: PlaceOrder) -> Result<Order> {
        metrics::counter!("orders_placement_attempts_total").increment(1);
        tracing::info!(phase = %PlacementPhase::Started, "placement started");

        match self.run_placement(request).await {
            Ok(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(
                    phase = %PlacementPhase::Completed,
                    order_id = %order.id(),
                    "placement completed"
                );
                Ok(order)
            }
            Err(error) => {
                metrics::counter!("orders_aborted_total").increment(1);
                tracing::warn!(phase = %PlacementPhase::Aborted, %error, "placement aborted");
                Err(error)
            }
        }
    }

    async fn run_placement(&self, request: PlaceOrder) -> Result<Order> {
        let buyer = self
            .buyers
            .buyer(request.buyer_id)
            .await
            .ok_or(CheckoutError::BuyerNotFound(request.buyer_id))?;

        tracing::debug!(phase = %PlacementPhase::Validating);
        let validated = self.validate_items(&request.items).await?;

        tracing::debug!(phase = %PlacementPhase::Reserving);
        let mut reservation = Reservation::new(&self.catalog);
        for item in &validated {
            if let Err(error) = reservation.decrement(&item.product, item.quantity).await {
                reservation.roll_back().await;
                return Err(error);
            }
        }

        let lines = validated
            .iter()
            .map(|item| {
                LineItem::new(
                    item.product.id,
                    item.product.seller_id,
                    item.quantity,
                    item.unit_price,
                )
            })
            .collect();
        let order = Order::new(
            request.buyer_id,
            request.shipping_address,
            request.payment_method,
            request.total,
            lines,
        );

        tracing::debug!(phase = %PlacementPhase::Persisting, order_id = %order.id());
        if let Err(error) = self.orders.insert(&order).await {
            reservation.roll_back().await;
            return Err(error.into());
        }

        tracing::debug!(phase = %PlacementPhase::NotifyingSellers, order_id = %order.id());
        self.notify_sellers(&order, &buyer).await;

        tracing::debug!(phase = %PlacementPhase::DispatchingReceipt, order_id = %order.id());
        self.dispatch_receipt(&order, &buyer);

        Ok(order)
    }

    async fn validate_items(&self, items: &[LineItemRequest]) -> Result<Vec<ValidatedItem>> {
        if items.is_empty() {
            return Err(CheckoutError::NoItems);
        }

        let mut validated = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity == 0 {
                return Err(CheckoutError::InvalidQuantity {
                    product_id: item.product_id,
                    quantity: item.quantity,
                });
            }
            if !item.unit_price.is_positive() {
                return Err(CheckoutError::InvalidPrice(item.product_id));
            }

            let product = self.catalog.product(item.product_id).await?;

            // Advisory pre-check only. Stock can still change before the
            // conditional decrement; that write is the authority.
            if !product.has_stock(item.quantity) {
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    requested: item.quantity,
                    available: product.stock,
                });
            }

            validated.push(ValidatedItem {
                product,
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }
        Ok(validated)
    }

    /// Notifies each distinct seller involved in the order exactly once.
    async fn notify_sellers(&self, order: &Order, buyer: &Buyer) {
        let mut notified: HashSet<UserId> = HashSet::new();
        for line in order.lines() {
            if !notified.insert(line.seller_id) {
                continue;
            }
            let body = format!("New order from {}. Total: {}", buyer.name, order.total());
            if let Err(error) = self
                .notifications
                .notify(
                    line.seller_id,
                    "New order received",
                    &body,
                    NotificationCategory::Order,
                )
                .await
            {
                tracing::warn!(
                    seller_id = %line.seller_id,
                    order_id = %order.id(),
                    %error,
                    "failed to notify seller"
                );
            }
        }
    }

    /// Spawns receipt delivery without waiting for it. A failed send is
    /// logged; the placed order is unaffected either way.
    fn dispatch_receipt(&self, order: &Order, buyer: &Buyer) {
        let mailer = Arc::clone(&self.mailer);
        let to = buyer.email.clone();
        let buyer_name = buyer.name.clone();
        let order_id = order.id();
        let total = order.total();

        tokio::spawn(async move {
            if let Err(error) = mailer.send_receipt(&to, &buyer_name, order_id, total).await {
                tracing::warn!(order_id = %order_id, %error, "failed to send receipt");
            }
        });
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.get(id).await?)
    }

    /// Returns the buyer's orders, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_buyer(&self, buyer_id: UserId) -> Result<Vec<Order>> {
        Ok(self.orders.orders_for_buyer(buyer_id).await?)
    }

    /// Returns orders involving the seller, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_seller(&self, seller_id: UserId) -> Result<Vec<Order>> {
        Ok(self.orders.orders_for_seller(seller_id).await?)
    }

    /// Applies a status transition and returns the updated order.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        Ok(self.orders.update_status(id, status).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::InMemoryCatalog;

    #[test]
    fn phase_names_are_stable() {
        assert_eq!(PlacementPhase::Started.as_str(), "started");
        assert_eq!(PlacementPhase::NotifyingSellers.as_str(), "notifying_sellers");
        assert_eq!(PlacementPhase::Aborted.to_string(), "aborted");
    }

    #[tokio::test]
    async fn reservation_chains_versions_for_repeated_product() {
        let catalog = InMemoryCatalog::new();
        let product = Product::new(UserId::new(), "Honey", Money::from_cents(800), 10);
        catalog.add_product(product.clone()).await;

        let mut reservation = Reservation::new(&catalog);
        reservation.decrement(&product, 3).await.unwrap();
        // Second decrement sees a stale product snapshot but must still
        // succeed via the chained version.
        reservation.decrement(&product, 4).await.unwrap();

        assert_eq!(catalog.stock_of(product.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn rollback_restores_in_reverse() {
        let catalog = InMemoryCatalog::new();
        let first = Product::new(UserId::new(), "Honey", Money::from_cents(800), 5);
        let second = Product::new(UserId::new(), "Jam", Money::from_cents(650), 5);
        catalog.add_product(first.clone()).await;
        catalog.add_product(second.clone()).await;

        let mut reservation = Reservation::new(&catalog);
        reservation.decrement(&first, 2).await.unwrap();
        reservation.decrement(&second, 3).await.unwrap();
        reservation.roll_back().await;

        assert_eq!(catalog.stock_of(first.id).await.unwrap(), 5);
        assert_eq!(catalog.stock_of(second.id).await.unwrap(), 5);
    }
}
