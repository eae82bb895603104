use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{NotificationError, Result};
use crate::notification::{Notification, NotificationCategory};
use crate::store::NotificationStore;

/// In-memory notification store implementation.
#[derive(Clone, Default)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationStore {
    /// Creates a new empty in-memory notification store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored notifications.
    pub async fn notification_count(&self) -> usize {
        self.notifications.read().await.len()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn notify(
        &self,
        recipient_id: UserId,
        title: &str,
        body: &str,
        category: NotificationCategory,
    ) -> Result<Notification> {
        let notification = Notification::new(recipient_id, title, body, category);
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn for_recipient(&self, recipient_id: UserId) -> Result<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut own: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(own)
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NotificationError::NotFound(id))?;
        notification.read = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_stores_unread_notification() {
        let store = InMemoryNotificationStore::new();
        let seller = UserId::new();

        let notification = store
            .notify(seller, "New order received", "body", NotificationCategory::Order)
            .await
            .unwrap();

        assert!(!notification.read);
        assert_eq!(store.notification_count().await, 1);
    }

    #[tokio::test]
    async fn for_recipient_filters_by_owner() {
        let store = InMemoryNotificationStore::new();
        let seller = UserId::new();

        store
            .notify(seller, "a", "first", NotificationCategory::Order)
            .await
            .unwrap();
        store
            .notify(UserId::new(), "b", "other", NotificationCategory::System)
            .await
            .unwrap();

        let own = store.for_recipient(seller).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].body, "first");
    }

    #[tokio::test]
    async fn mark_read_flips_flag() {
        let store = InMemoryNotificationStore::new();
        let seller = UserId::new();

        let notification = store
            .notify(seller, "a", "b", NotificationCategory::Order)
            .await
            .unwrap();
        store.mark_read(notification.id).await.unwrap();

        let own = store.for_recipient(seller).await.unwrap();
        assert!(own[0].read);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_fails() {
        let store = InMemoryNotificationStore::new();
        let result = store.mark_read(Uuid::new_v4()).await;
        assert!(matches!(result, Err(NotificationError::NotFound(_))));
    }
}
