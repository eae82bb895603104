use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::{OrderStoreError, Result};
use crate::order::{LineItem, Order};
use crate::status::OrderStatus;
use crate::store::OrderStore;

const ORDER_COLUMNS: &str =
    "id, buyer_id, status, total_cents, shipping_address, payment_method, created_at";

/// PostgreSQL-backed order store implementation.
///
/// The header and all line items are written inside one transaction, so
/// a partially persisted order is never visible.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_header(row: &PgRow) -> Result<(OrderId, UserId, OrderStatus, Money, String, String, DateTime<Utc>)>
    {
        let status_text: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_text).ok_or_else(|| {
            OrderStoreError::Database(sqlx::Error::Decode(
                format!("unknown order status: {status_text}").into(),
            ))
        })?;

        Ok((
            OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            UserId::from_uuid(row.try_get::<Uuid, _>("buyer_id")?),
            status,
            Money::from_cents(row.try_get("total_cents")?),
            row.try_get("shipping_address")?,
            row.try_get("payment_method")?,
            row.try_get("created_at")?,
        ))
    }

    fn row_to_line(row: &PgRow) -> Result<LineItem> {
        Ok(LineItem {
            id: row.try_get("id")?,
            product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
            seller_id: UserId::from_uuid(row.try_get::<Uuid, _>("seller_id")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            subtotal: Money::from_cents(row.try_get("subtotal_cents")?),
        })
    }

    async fn lines_for(&self, order_id: OrderId) -> Result<Vec<LineItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, seller_id, quantity, unit_price_cents, subtotal_cents
            FROM order_lines
            WHERE order_id = $1
            ORDER BY position
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_line).collect()
    }

    async fn hydrate(&self, row: &PgRow) -> Result<Order> {
        let (id, buyer_id, status, total, address, payment_method, created_at) =
            Self::row_to_header(row)?;
        let lines = self.lines_for(id).await?;
        Ok(Order::from_parts(
            id,
            buyer_id,
            status,
            total,
            address,
            payment_method,
            created_at,
            lines,
        ))
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    async fn insert(&self, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, buyer_id, status, total_cents, shipping_address, payment_method, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.buyer_id().as_uuid())
        .bind(order.status().as_str())
        .bind(order.total().cents())
        .bind(order.shipping_address())
        .bind(order.payment_method())
        .bind(order.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return OrderStoreError::AlreadyExists(order.id());
            }
            OrderStoreError::Database(e)
        })?;

        for (position, line) in order.lines().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_lines
                    (id, order_id, position, product_id, seller_id, quantity, unit_price_cents, subtotal_cents)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(line.id)
            .bind(order.id().as_uuid())
            .bind(position as i32)
            .bind(line.product_id.as_uuid())
            .bind(line.seller_id.as_uuid())
            .bind(line.quantity as i32)
            .bind(line.unit_price.cents())
            .bind(line.subtotal.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    async fn orders_for_buyer(&self, buyer_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(buyer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }

    async fn orders_for_seller(&self, seller_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT DISTINCT {ORDER_COLUMNS}
            FROM orders
            WHERE id IN (SELECT order_id FROM order_lines WHERE seller_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(seller_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let current_text: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        let current_text = current_text.ok_or(OrderStoreError::NotFound(id))?;
        let current = OrderStatus::parse(&current_text).ok_or_else(|| {
            OrderStoreError::Database(sqlx::Error::Decode(
                format!("unknown order status: {current_text}").into(),
            ))
        })?;

        if !current.can_transition_to(status) {
            return Err(OrderStoreError::InvalidStatusTransition {
                from: current,
                to: status,
            });
        }

        sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get(id).await?.ok_or(OrderStoreError::NotFound(id))
    }
}
