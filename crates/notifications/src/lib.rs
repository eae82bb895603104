//! Seller notifications and the receipt mail seam.
//!
//! Both surfaces here back best-effort post-commit effects: the checkout
//! orchestrator calls them only after an order is durably persisted, and
//! their failures are logged rather than propagated.

pub mod error;
pub mod mailer;
pub mod memory;
pub mod notification;
pub mod postgres;
pub mod store;

pub use error::{NotificationError, Result};
pub use mailer::{InMemoryMailer, MailError, Mailer, ReceiptEmail};
pub use memory::InMemoryNotificationStore;
pub use notification::{Notification, NotificationCategory};
pub use postgres::PostgresNotificationStore;
pub use store::NotificationStore;
