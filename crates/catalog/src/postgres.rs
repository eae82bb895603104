use async_trait::async_trait;
use common::{Money, ProductId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::product::{Product, Version};
use crate::store::ProductCatalog;

/// PostgreSQL-backed catalog implementation.
///
/// The conditional decrement is a single guarded `UPDATE`, so the
/// version check and the write are atomic on the database side.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new PostgreSQL catalog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Inserts a product listing. Intended for seeding and tests; the
    /// catalog CRUD surface proper lives outside this core.
    pub async fn insert_product(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, seller_id, name, unit_price_cents, stock, version)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.seller_id.as_uuid())
        .bind(&product.name)
        .bind(product.unit_price.cents())
        .bind(i64::from(product.stock))
        .bind(product.version.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn row_to_product(row: &PgRow) -> Result<Product> {
        let stock: i64 = row.try_get("stock")?;
        let stock = u32::try_from(stock).map_err(|_| {
            CatalogError::Database(sqlx::Error::Decode(
                format!("stock out of range: {stock}").into(),
            ))
        })?;

        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            seller_id: UserId::from_uuid(row.try_get::<Uuid, _>("seller_id")?),
            name: row.try_get("name")?,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            stock,
            version: Version::new(row.try_get("version")?),
        })
    }
}

#[async_trait]
impl ProductCatalog for PostgresCatalog {
    async fn product(&self, id: ProductId) -> Result<Product> {
        let row = sqlx::query(
            "SELECT id, seller_id, name, unit_price_cents, stock, version FROM products WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::NotFound(id))?;

        Self::row_to_product(&row)
    }

    #[tracing::instrument(skip(self))]
    async fn decrement_stock(
        &self,
        id: ProductId,
        amount: u32,
        expected_version: Version,
    ) -> Result<Version> {
        let new_version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock = stock - $2, version = version + 1
            WHERE id = $1 AND version = $3 AND stock >= $2
            RETURNING version
            "#,
        )
        .bind(id.as_uuid())
        .bind(i64::from(amount))
        .bind(expected_version.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(version) = new_version {
            return Ok(Version::new(version));
        }

        // The guarded UPDATE matched nothing. Re-read to classify the
        // failure; the record may move again in the meantime, but the
        // classification only affects the error reported to the caller.
        let current = self.product(id).await?;
        if current.version != expected_version {
            Err(CatalogError::Conflict {
                product_id: id,
                expected: expected_version,
                actual: current.version,
            })
        } else {
            Err(CatalogError::InsufficientStock {
                product_id: id,
                requested: amount,
                available: current.stock,
            })
        }
    }

    #[tracing::instrument(skip(self))]
    async fn restore_stock(&self, id: ProductId, amount: u32) -> Result<Version> {
        let new_version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock = stock + $2, version = version + 1
            WHERE id = $1
            RETURNING version
            "#,
        )
        .bind(id.as_uuid())
        .bind(i64::from(amount))
        .fetch_optional(&self.pool)
        .await?;

        new_version
            .map(Version::new)
            .ok_or(CatalogError::NotFound(id))
    }
}
