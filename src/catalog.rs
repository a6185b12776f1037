//! Catalog supplier port and the bundled catalog.
//!
//! The storefront never owns product data; it reads whatever a [`Catalog`]
//! hands it. [`StaticCatalog`] covers the demo data set and JSON files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::aggregates::Product;
use crate::domain::value_objects::{Price, Rating};

/// A category offered in the filter sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

impl Category {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),
}

/// Anything that can supply the product list.
pub trait Catalog: Send + Sync {
    fn products(&self) -> Vec<Product>;
    fn categories(&self) -> Vec<Category>;

    fn find(&self, id: &str) -> Option<Product> {
        self.products().into_iter().find(|p| p.id == id)
    }
}

/// An immutable in-memory catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticCatalog {
    products: Vec<Product>,
    #[serde(default)]
    categories: Vec<Category>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = products.iter().find(|p| !seen.insert(p.id.as_str())) {
            return Err(CatalogError::DuplicateProduct(dup.id.clone()));
        }
        Ok(Self { products, categories })
    }

    /// Loads `{"products": [...], "categories": [...]}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let parsed: StaticCatalog = serde_json::from_str(&raw)?;
        let catalog = Self::new(parsed.products, parsed.categories)?;
        info!(path = %path.as_ref().display(), products = catalog.products.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn demo() -> Self {
        let img = |photo: &str| format!("https://images.unsplash.com/photo-{photo}?w=400&q=80");
        let products = vec![
            Product::new("1", "Minimalist Desk Lamp", Price::from_cents(4999), img("1507473885765-e6ed057f782c"), Rating::new(4.5), "home"),
            Product::new("2", "Ergonomic Office Chair", Price::from_cents(19999), img("1505843490538-5133c6c7d0e1"), Rating::new(4.8), "furniture"),
            Product::new("3", "Wireless Headphones", Price::from_cents(12999), img("1505740420928-5e560c06d30e"), Rating::new(4.3), "electronics"),
            Product::new("4", "Smart Watch", Price::from_cents(29999), img("1523275335684-37898b6baf30"), Rating::new(4.6), "electronics"),
            Product::new("5", "Ceramic Coffee Mug", Price::from_cents(1999), img("1514228742587-6b1558fcca3d"), Rating::new(4.2), "home"),
            Product::new("6", "Leather Wallet", Price::from_cents(5999), img("1627123424574-724758594e93"), Rating::new(4.4), "accessories"),
            Product::new("7", "Portable Bluetooth Speaker", Price::from_cents(7999), img("1608043152269-423dbba4e7e1"), Rating::new(4.1), "electronics"),
            Product::new("8", "Minimalist Backpack", Price::from_cents(8999), img("1622560480654-d96214fdc887"), Rating::new(4.7), "accessories"),
        ];
        let categories = vec![
            Category::new("electronics", "Electronics"),
            Category::new("clothing", "Clothing"),
            Category::new("home", "Home & Kitchen"),
            Category::new("books", "Books"),
            Category::new("toys", "Toys & Games"),
        ];
        Self { products, categories }
    }
}

impl Catalog for StaticCatalog {
    fn products(&self) -> Vec<Product> { self.products.clone() }
    fn categories(&self) -> Vec<Category> { self.categories.clone() }

    fn find(&self, id: &str) -> Option<Product> { self.products.iter().find(|p| p.id == id).cloned() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_demo_catalog() {
        let catalog = StaticCatalog::demo();
        assert_eq!(catalog.products().len(), 8);
        assert_eq!(catalog.categories().len(), 5);
        assert_eq!(catalog.find("4").map(|p| p.name), Some("Smart Watch".to_string()));
        assert!(catalog.find("99").is_none());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let p = StaticCatalog::demo().products().remove(0);
        let err = StaticCatalog::new(vec![p.clone(), p], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProduct(id) if id == "1"));
    }

    #[test]
    fn test_loads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"products":[{{"id":"x","name":"X","price":"12.50","image":"","rating":3.5,"category":"books"}}]}}"#).unwrap();
        let catalog = StaticCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.products()[0].price, Price::from_cents(1250));
        assert!(catalog.categories().is_empty());
    }

    #[test]
    fn test_bad_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(StaticCatalog::from_json_file(file.path()), Err(CatalogError::Parse(_))));
        assert!(matches!(StaticCatalog::from_json_file("/nonexistent/catalog.json"), Err(CatalogError::Io(_))));
    }
}
