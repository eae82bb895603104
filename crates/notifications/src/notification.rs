//! Notification record and categories.

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationCategory {
    /// A new order involving the recipient's products.
    Order,

    /// Shipment progress.
    Shipment,

    /// Marketing / promotions.
    Promotion,

    /// Platform announcements.
    System,
}

impl NotificationCategory {
    /// Returns the category name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Order => "ORDER",
            NotificationCategory::Shipment => "SHIPMENT",
            NotificationCategory::Promotion => "PROMOTION",
            NotificationCategory::System => "SYSTEM",
        }
    }

    /// Parses a stored category name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ORDER" => Some(NotificationCategory::Order),
            "SHIPMENT" => Some(NotificationCategory::Shipment),
            "PROMOTION" => Some(NotificationCategory::Promotion),
            "SYSTEM" => Some(NotificationCategory::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification owned by its recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification identity.
    pub id: Uuid,

    /// The user this notification belongs to.
    pub recipient_id: UserId,

    /// Short headline.
    pub title: String,

    /// Full message body.
    pub body: String,

    /// Category tag.
    pub category: NotificationCategory,

    /// Whether the recipient has read it.
    pub read: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a new unread notification.
    pub fn new(
        recipient_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        category: NotificationCategory,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            title: title.into(),
            body: body.into(),
            category,
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_is_unread() {
        let n = Notification::new(
            UserId::new(),
            "New order received",
            "You sold something.",
            NotificationCategory::Order,
        );
        assert!(!n.read);
        assert_eq!(n.category, NotificationCategory::Order);
    }

    #[test]
    fn category_parse_roundtrips() {
        for category in [
            NotificationCategory::Order,
            NotificationCategory::Shipment,
            NotificationCategory::Promotion,
            NotificationCategory::System,
        ] {
            assert_eq!(NotificationCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(NotificationCategory::parse("NEWSLETTER"), None);
    }

    #[test]
    fn serialization_roundtrip() {
        let n = Notification::new(
            UserId::new(),
            "New order received",
            "You sold something.",
            NotificationCategory::Order,
        );
        let json = serde_json::to_string(&n).unwrap();
        let deserialized: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(n, deserialized);
    }
}
