//! Buyer lookup seam.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;

/// The buyer details placement needs: a greeting name and a mail address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buyer {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl Buyer {
    /// Creates a buyer record.
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Resolves buyer identities to buyer records.
#[async_trait]
pub trait BuyerDirectory: Send + Sync {
    /// Looks up a buyer. Returns `None` if the account does not exist.
    async fn buyer(&self, id: UserId) -> Option<Buyer>;
}

/// In-memory buyer directory implementation.
#[derive(Clone, Default)]
pub struct InMemoryBuyerDirectory {
    buyers: Arc<RwLock<HashMap<UserId, Buyer>>>,
}

impl InMemoryBuyerDirectory {
    /// Creates a new empty buyer directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a buyer, replacing any previous record for the same ID.
    pub fn add_buyer(&self, buyer: Buyer) {
        if let Ok(mut buyers) = self.buyers.write() {
            buyers.insert(buyer.id, buyer);
        }
    }
}

#[async_trait]
impl BuyerDirectory for InMemoryBuyerDirectory {
    async fn buyer(&self, id: UserId) -> Option<Buyer> {
        self.buyers
            .read()
            .ok()
            .and_then(|buyers| buyers.get(&id).cloned())
    }
}
