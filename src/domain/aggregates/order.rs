//! Order summary shown alongside the cart

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use crate::domain::aggregates::cart::CartStore;
use crate::domain::value_objects::Price;

/// Flat rate applied when no other rate is configured.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Checkout totals derived from the current cart. Shipping is free.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub item_count: u64,
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    pub fn from_cart(cart: &CartStore, tax_rate: Decimal) -> Self {
        let subtotal = cart.subtotal();
        let shipping = Price::ZERO;
        let tax = Price::new(
            subtotal.amount()
                .saturating_mul(tax_rate.max(Decimal::ZERO))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        );
        let total = subtotal.saturating_add(shipping).saturating_add(tax);
        Self { item_count: cart.cart_count(), subtotal, shipping, tax, total }
    }

    pub fn is_empty(&self) -> bool { self.item_count == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::ProductSnapshot;

    #[test]
    fn test_summary_applies_flat_tax() {
        let mut cart = CartStore::new();
        let lamp = ProductSnapshot { id: "1".into(), name: "Lamp".into(), price: Price::from_cents(4999), image: String::new() };
        cart.add_to_cart(lamp.clone());
        cart.add_to_cart(lamp);
        let summary = OrderSummary::from_cart(&cart, DEFAULT_TAX_RATE);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.subtotal, Price::from_cents(9998));
        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(summary.tax, Price::from_cents(1000));
        assert_eq!(summary.total, Price::from_cents(10998));
    }

    #[test]
    fn test_summary_saturates_on_huge_prices() {
        let mut cart = CartStore::new();
        let vault = ProductSnapshot { id: "v".into(), name: "Vault".into(), price: Price::new(Decimal::MAX), image: String::new() };
        cart.add_to_cart(vault.clone());
        cart.add_to_cart(vault);
        let summary = OrderSummary::from_cart(&cart, DEFAULT_TAX_RATE);
        assert_eq!(summary.subtotal, Price::new(Decimal::MAX));
        assert_eq!(summary.total, Price::new(Decimal::MAX));
    }

    #[test]
    fn test_empty_cart_summary() {
        let summary = OrderSummary::from_cart(&CartStore::new(), DEFAULT_TAX_RATE);
        assert!(summary.is_empty());
        assert_eq!(summary.total, Price::ZERO);
    }
}
