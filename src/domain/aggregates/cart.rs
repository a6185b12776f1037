//! Cart Aggregate
//!
//! An ordered set of lines keyed by product id. Count and subtotal are derived
//! from the lines on every read, so they can never drift from the stored state.
//! None of the operations fail: unknown ids and non-positive quantities resolve
//! to a no-op or a removal.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;
use crate::domain::aggregates::product::ProductSnapshot;
use crate::domain::events::CartEvent;
use crate::domain::value_objects::{Price, Quantity};

#[derive(Clone, Debug)]
pub struct CartStore {
    id: String,
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<CartEvent>,
}

/// One product in the cart. Name, price and image are frozen at first add.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub quantity: Quantity,
}

impl CartLine {
    pub fn line_total(&self) -> Price { self.price.multiply(self.quantity.value()) }
}

impl Default for CartStore {
    fn default() -> Self { Self::new() }
}

impl CartStore {
    pub fn new() -> Self {
        let now = Utc::now();
        Self { id: Uuid::new_v4().to_string(), lines: vec![], created_at: now, updated_at: now, events: vec![] }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn line(&self, id: &str) -> Option<&CartLine> { self.lines.iter().find(|l| l.id == id) }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Sum of all line quantities.
    pub fn cart_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity.value())).sum()
    }

    /// Sum of `price * quantity` over all lines.
    pub fn subtotal(&self) -> Price { self.lines.iter().map(CartLine::line_total).sum() }

    pub fn line_total(&self, id: &str) -> Option<Price> { self.line(id).map(CartLine::line_total) }

    /// Adds one unit. An existing line keeps the snapshot it was created with.
    pub fn add_to_cart(&mut self, product: ProductSnapshot) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == product.id) {
            existing.quantity = existing.quantity.increment();
            debug!(cart_id = %self.id, product_id = %product.id, quantity = existing.quantity.value(), "cart line incremented");
            let event = CartEvent::QuantityChanged { product_id: product.id, quantity: existing.quantity.value() };
            self.record(event);
        } else {
            debug!(cart_id = %self.id, product_id = %product.id, "cart line added");
            let product_id = product.id.clone();
            self.lines.push(CartLine {
                id: product.id, name: product.name, price: product.price, image: product.image, quantity: Quantity::ONE,
            });
            self.record(CartEvent::LineAdded { product_id });
        }
    }

    pub fn remove_from_cart(&mut self, id: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        if self.lines.len() == before { return; }
        debug!(cart_id = %self.id, product_id = id, "cart line removed");
        self.record(CartEvent::LineRemoved { product_id: id.to_string() });
    }

    /// Absolute set. Zero or negative removes the line; unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let Some(quantity) = Quantity::from_requested(quantity) else {
            self.remove_from_cart(id);
            return;
        };
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else { return };
        if line.quantity == quantity { return; }
        line.quantity = quantity;
        debug!(cart_id = %self.id, product_id = id, quantity = quantity.value(), "cart quantity updated");
        self.record(CartEvent::QuantityChanged { product_id: id.to_string(), quantity: quantity.value() });
    }

    pub fn clear_cart(&mut self) {
        if self.lines.is_empty() { return; }
        let lines = self.lines.len();
        self.lines.clear();
        debug!(cart_id = %self.id, lines, "cart cleared");
        self.record(CartEvent::Cleared { lines });
    }

    pub fn take_events(&mut self) -> Vec<CartEvent> { std::mem::take(&mut self.events) }

    fn record(&mut self, e: CartEvent) {
        self.events.push(e);
        self.updated_at = Utc::now();
    }
}
