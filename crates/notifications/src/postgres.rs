use async_trait::async_trait;
use common::UserId;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::{NotificationError, Result};
use crate::notification::{Notification, NotificationCategory};
use crate::store::NotificationStore;

/// PostgreSQL-backed notification store implementation.
#[derive(Clone)]
pub struct PostgresNotificationStore {
    pool: PgPool,
}

impl PostgresNotificationStore {
    /// Creates a new PostgreSQL notification store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_notification(row: &PgRow) -> Result<Notification> {
        let category_text: String = row.try_get("category")?;
        let category = NotificationCategory::parse(&category_text).ok_or_else(|| {
            NotificationError::Database(sqlx::Error::Decode(
                format!("unknown notification category: {category_text}").into(),
            ))
        })?;

        Ok(Notification {
            id: row.try_get("id")?,
            recipient_id: UserId::from_uuid(row.try_get::<Uuid, _>("recipient_id")?),
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            category,
            read: row.try_get("read")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    #[tracing::instrument(skip(self, body))]
    async fn notify(
        &self,
        recipient_id: UserId,
        title: &str,
        body: &str,
        category: NotificationCategory,
    ) -> Result<Notification> {
        let notification = Notification::new(recipient_id, title, body, category);

        sqlx::query(
            r#"
            INSERT INTO notifications (id, recipient_id, title, body, category, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id)
        .bind(notification.recipient_id.as_uuid())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.category.as_str())
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn for_recipient(&self, recipient_id: UserId) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
            SELECT id, recipient_id, title, body, category, read, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(recipient_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_notification).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn mark_read(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(NotificationError::NotFound(id));
        }
        Ok(())
    }
}
