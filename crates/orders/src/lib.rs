//! Order aggregate and persistence for the marketplace.
//!
//! An order is created exactly once, as one atomic unit of header plus
//! line items, by the checkout orchestrator. After creation only its
//! status changes, driven by external shipment and admin collaborators.

pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod status;
pub mod store;

pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderStore;
pub use order::{LineItem, Order};
pub use postgres::PostgresOrderStore;
pub use status::OrderStatus;
pub use store::OrderStore;
