//! Product record as supplied by the catalog

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{Price, Rating};

/// A catalog entry. Owned by the catalog supplier; the storefront only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub rating: Rating,
    pub category: String,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        image: impl Into<String>,
        rating: Rating,
        category: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), price, image: image.into(), rating, category: category.into() }
    }

    /// The subset of fields the cart captures when the product is added.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot { id: self.id.clone(), name: self.name.clone(), price: self.price, image: self.image.clone() }
    }
}

/// What `addToCart` receives: identity plus the display fields frozen into the line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub image: String,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self { product.snapshot() }
}
