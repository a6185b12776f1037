//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{Product, ProductSnapshot};
pub use order::{OrderSummary, DEFAULT_TAX_RATE};
pub use cart::{CartStore, CartLine};
