//! Order placement orchestration.
//!
//! [`CheckoutService`] drives a placement attempt through validation,
//! stock reservation, order persistence, seller notification and receipt
//! dispatch. Reservation and persistence are all-or-nothing via
//! compensating stock restores; the two trailing effects are best-effort
//! and never fail a placed order.

pub mod config;
pub mod error;
pub mod placement;
pub mod services;

pub use config::Config;
pub use error::{CheckoutError, Result};
pub use placement::{CheckoutService, LineItemRequest, PlaceOrder, PlacementPhase};
pub use services::buyers::{Buyer, BuyerDirectory, InMemoryBuyerDirectory};
