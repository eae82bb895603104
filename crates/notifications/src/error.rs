//! Notification store error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during notification operations.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// No notification with the given identity exists.
    #[error("Notification not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for notification results.
pub type Result<T> = std::result::Result<T, NotificationError>;
