//! Value Objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit price in the store currency. Never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Negative amounts clamp to zero.
    pub fn new(amount: Decimal) -> Self { Self(amount.max(Decimal::ZERO)) }

    /// `Price::from_cents(4999)` is `$49.99`.
    pub fn from_cents(cents: i64) -> Self { Self::new(Decimal::new(cents, 2)) }

    pub fn amount(&self) -> Decimal { self.0 }

    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn multiply(&self, qty: u32) -> Price { Price(self.0.saturating_mul(Decimal::from(qty))) }

    pub fn saturating_add(&self, other: Price) -> Price { Price(self.0.saturating_add(other.0)) }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self { Self::new(amount) }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self { price.0 }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "${:.2}", self.0) }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::ZERO, |acc, p| acc.saturating_add(p))
    }
}

/// Customer rating on a 0.0 to 5.0 scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MAX: f64 = 5.0;

    /// Out-of-range values clamp into `0.0..=5.0`; NaN becomes `0.0`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() { return Self(0.0); }
        Self(value.clamp(0.0, Self::MAX))
    }

    pub fn value(&self) -> f64 { self.0 }
}

impl From<f64> for Rating {
    fn from(value: f64) -> Self { Self::new(value) }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self { rating.0 }
}

/// Quantity of a cart line. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Maps a possibly non-positive request onto a quantity; `None` means "remove".
    pub fn from_requested(value: i64) -> Option<Self> {
        if value <= 0 { return None; }
        Some(Self(u32::try_from(value).unwrap_or(u32::MAX)))
    }

    pub fn value(&self) -> u32 { self.0 }
    pub fn increment(&self) -> Self { Self(self.0.saturating_add(1)) }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Self::new(value).ok_or(QuantityError::Zero) }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self { qty.0 }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("quantity must be at least 1")]
    Zero,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_clamps_negative() {
        assert_eq!(Price::new(Decimal::new(-5, 0)), Price::ZERO);
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
    }

    #[test]
    fn test_price_multiply_and_sum() {
        let total: Price = [Price::from_cents(1000).multiply(2), Price::from_cents(500)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::new(25, 0));
    }

    #[test]
    fn test_price_arithmetic_saturates() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max.multiply(3), max);
        assert_eq!(max.saturating_add(Price::from_cents(1)), max);
        assert_eq!([max, max].into_iter().sum::<Price>(), max);
    }

    #[test]
    fn test_rating_clamps() {
        assert_eq!(Rating::new(7.2).value(), 5.0);
        assert_eq!(Rating::new(-1.0).value(), 0.0);
        assert_eq!(Rating::new(f64::NAN).value(), 0.0);
        assert_eq!(Rating::new(4.5).value(), 4.5);
    }

    #[test]
    fn test_quantity() {
        assert!(Quantity::new(0).is_none());
        assert!(Quantity::from_requested(-5).is_none());
        assert_eq!(Quantity::from_requested(3).map(|q| q.value()), Some(3));
        assert_eq!(Quantity::from_requested(i64::MAX).map(|q| q.value()), Some(u32::MAX));
        assert_eq!(Quantity::ONE.increment().value(), 2);
    }

    #[test]
    fn test_price_deserializes_from_number() {
        let p: Price = serde_json::from_str("49.99").unwrap();
        assert_eq!(p, Price::from_cents(4999));
        let q: std::result::Result<Quantity, _> = serde_json::from_str("0");
        assert!(q.is_err());
    }
}
