//! Shared types for the marketplace order core.
//!
//! Typed identifiers prevent mixing up buyer, seller, product, and order
//! IDs at compile time; [`Money`] keeps all monetary arithmetic in exact
//! integer cents.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::{OrderId, ProductId, UserId};
