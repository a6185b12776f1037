//! Domain events
use serde::{Deserialize, Serialize};

/// Recorded by the cart store for each state-changing mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    LineAdded { product_id: String },
    QuantityChanged { product_id: String, quantity: u32 },
    LineRemoved { product_id: String },
    Cleared { lines: usize },
}

/// Session transitions broadcast by an auth gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
}
