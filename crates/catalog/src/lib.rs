//! Inventory record store for the marketplace.
//!
//! Every product carries a stock count and a monotonically increasing
//! version stamp. Stock is only ever mutated through conditional writes
//! guarded by that version, which is what makes concurrent order
//! placement safe without any in-process locking between requests.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod product;
pub mod store;

pub use error::{CatalogError, Result};
pub use memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;
pub use product::{Product, Version};
pub use store::ProductCatalog;
