//! Order aggregate and line items.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::OrderStatus;

/// A line item within an order.
///
/// Owned exclusively by its order and immutable after creation. Unit
/// price and seller are snapshots taken at placement time; later catalog
/// changes do not affect them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item identity.
    pub id: Uuid,

    /// The product this line refers to.
    pub product_id: ProductId,

    /// The seller who owned the product at placement time.
    pub seller_id: UserId,

    /// Units ordered. Always positive.
    pub quantity: u32,

    /// Price per unit at placement time.
    pub unit_price: Money,

    /// quantity × unit price, computed once at creation.
    pub subtotal: Money,
}

impl LineItem {
    /// Creates a new line item, computing its subtotal.
    pub fn new(product_id: ProductId, seller_id: UserId, quantity: u32, unit_price: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            seller_id,
            quantity,
            unit_price,
            subtotal: unit_price.multiply(quantity),
        }
    }
}

/// An order: header plus its ordered collection of line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    buyer_id: UserId,
    status: OrderStatus,
    /// Total as declared by the caller. Stored, not derived from the
    /// line items; the two are not reconciled here.
    total: Money,
    shipping_address: String,
    payment_method: String,
    created_at: DateTime<Utc>,
    lines: Vec<LineItem>,
}

impl Order {
    /// Builds a new pending order from its parts.
    pub fn new(
        buyer_id: UserId,
        shipping_address: impl Into<String>,
        payment_method: impl Into<String>,
        total: Money,
        lines: Vec<LineItem>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            buyer_id,
            status: OrderStatus::Pending,
            total,
            shipping_address: shipping_address.into(),
            payment_method: payment_method.into(),
            created_at: Utc::now(),
            lines,
        }
    }

    /// Reassembles a persisted order. Store implementations only.
    pub(crate) fn from_parts(
        id: OrderId,
        buyer_id: UserId,
        status: OrderStatus,
        total: Money,
        shipping_address: String,
        payment_method: String,
        created_at: DateTime<Utc>,
        lines: Vec<LineItem>,
    ) -> Self {
        Self {
            id,
            buyer_id,
            status,
            total,
            shipping_address,
            payment_method,
            created_at,
            lines,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn buyer_id(&self) -> UserId {
        self.buyer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Line items in the order they were requested.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of the line-item subtotals. Not required to equal
    /// [`Order::total`].
    pub fn subtotal_sum(&self) -> Money {
        self.lines.iter().map(|line| line.subtotal).sum()
    }

    /// Returns true if any line belongs to the given seller.
    pub fn involves_seller(&self, seller_id: UserId) -> bool {
        self.lines.iter().any(|line| line.seller_id == seller_id)
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        let seller = UserId::new();
        Order::new(
            UserId::new(),
            "12 Market Street",
            "card",
            Money::from_cents(3500),
            vec![
                LineItem::new(ProductId::new(), seller, 2, Money::from_cents(1000)),
                LineItem::new(ProductId::new(), seller, 3, Money::from_cents(500)),
            ],
        )
    }

    #[test]
    fn line_item_subtotal_is_quantity_times_unit_price() {
        let line = LineItem::new(ProductId::new(), UserId::new(), 3, Money::from_cents(333));
        assert_eq!(line.subtotal.cents(), 999);
    }

    #[test]
    fn new_order_is_pending() {
        let order = sample_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.line_count(), 2);
    }

    #[test]
    fn subtotal_sum_adds_all_lines() {
        let order = sample_order();
        assert_eq!(order.subtotal_sum().cents(), 3500);
    }

    #[test]
    fn declared_total_is_stored_as_given() {
        let order = Order::new(
            UserId::new(),
            "12 Market Street",
            "card",
            Money::from_cents(1),
            vec![LineItem::new(
                ProductId::new(),
                UserId::new(),
                2,
                Money::from_cents(1000),
            )],
        );
        // Known gap carried over from the original contract: the
        // declared total is trusted, not reconciled.
        assert_eq!(order.total().cents(), 1);
        assert_eq!(order.subtotal_sum().cents(), 2000);
    }

    #[test]
    fn involves_seller_checks_lines() {
        let seller = UserId::new();
        let order = Order::new(
            UserId::new(),
            "12 Market Street",
            "cash",
            Money::from_cents(500),
            vec![LineItem::new(
                ProductId::new(),
                seller,
                1,
                Money::from_cents(500),
            )],
        );
        assert!(order.involves_seller(seller));
        assert!(!order.involves_seller(UserId::new()));
    }

    #[test]
    fn lines_keep_request_order() {
        let order = sample_order();
        assert_eq!(order.lines()[0].quantity, 2);
        assert_eq!(order.lines()[1].quantity, 3);
    }

    #[test]
    fn serialization_roundtrip() {
        let order = sample_order();
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
