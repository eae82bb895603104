//! Receipt email dispatch.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, OrderId};
use thiserror::Error;

/// Errors that can occur while sending mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// The mail provider rejected or failed the send.
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// A rendered order receipt, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptEmail {
    /// Destination address.
    pub to: String,

    /// Buyer's display name used in the greeting.
    pub buyer_name: String,

    /// The order this receipt covers.
    pub order_id: OrderId,

    /// Order total as charged.
    pub total: Money,
}

/// Outbound mail delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends an order receipt to the buyer.
    async fn send_receipt(
        &self,
        to: &str,
        buyer_name: &str,
        order_id: OrderId,
        total: Money,
    ) -> Result<(), MailError>;
}

/// In-memory mailer implementation for testing.
#[derive(Clone, Default)]
pub struct InMemoryMailer {
    sent: Arc<RwLock<Vec<ReceiptEmail>>>,
    fail_on_send: Arc<RwLock<bool>>,
}

impl InMemoryMailer {
    /// Creates a new in-memory mailer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the mailer to fail delivery (for testing failure paths).
    pub fn set_fail_on_send(&self, fail: bool) {
        if let Ok(mut guard) = self.fail_on_send.write() {
            *guard = fail;
        }
    }

    /// Returns the number of receipts delivered so far.
    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|sent| sent.len()).unwrap_or(0)
    }

    /// Returns copies of all delivered receipts.
    pub fn sent_receipts(&self) -> Vec<ReceiptEmail> {
        self.sent.read().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send_receipt(
        &self,
        to: &str,
        buyer_name: &str,
        order_id: OrderId,
        total: Money,
    ) -> Result<(), MailError> {
        let should_fail = self.fail_on_send.read().map(|guard| *guard).unwrap_or(false);
        if should_fail {
            return Err(MailError::Delivery(format!(
                "simulated delivery failure for {to}"
            )));
        }

        if let Ok(mut sent) = self.sent.write() {
            sent.push(ReceiptEmail {
                to: to.to_string(),
                buyer_name: buyer_name.to_string(),
                order_id,
                total,
            });
        }
        Ok(())
    }
}
