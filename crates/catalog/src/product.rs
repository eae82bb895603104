//! Product record and its version stamp.

use common::{Money, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// Version stamp of a product record.
///
/// Strictly increases with every committed stock mutation and is the
/// basis for conflict detection on conditional writes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Version(i64);

impl Version {
    /// Creates a version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial version (0) for a freshly listed product.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// The inventory-relevant view of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identity.
    pub id: ProductId,

    /// The seller who owns the listing.
    pub seller_id: UserId,

    /// Human-readable product name.
    pub name: String,

    /// Current unit price.
    pub unit_price: Money,

    /// Units currently in stock. Never negative.
    pub stock: u32,

    /// Version stamp, bumped on every committed stock mutation.
    pub version: Version,
}

impl Product {
    /// Creates a new product listing with a fresh identity and version 0.
    pub fn new(seller_id: UserId, name: impl Into<String>, unit_price: Money, stock: u32) -> Self {
        Self {
            id: ProductId::new(),
            seller_id,
            name: name.into(),
            unit_price,
            stock,
            version: Version::initial(),
        }
    }

    /// Returns true if the observed stock covers the requested quantity.
    pub fn has_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}
