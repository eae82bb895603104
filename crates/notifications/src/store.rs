//! Notification persistence trait.

use async_trait::async_trait;
use common::UserId;
use uuid::Uuid;

use crate::error::Result;
use crate::notification::{Notification, NotificationCategory};

/// Persistence for per-user notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Creates and stores a new unread notification for the recipient.
    async fn notify(
        &self,
        recipient_id: UserId,
        title: &str,
        body: &str,
        category: NotificationCategory,
    ) -> Result<Notification>;

    /// Returns the recipient's notifications, newest first.
    async fn for_recipient(&self, recipient_id: UserId) -> Result<Vec<Notification>>;

    /// Marks a notification as read.
    async fn mark_read(&self, id: Uuid) -> Result<()>;
}
