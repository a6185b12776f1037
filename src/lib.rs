//! OpenSASE Storefront
//!
//! The shopper-facing core of a small online store.
//!
//! ## Features
//! - Product catalog filtering and sorting
//! - Shopping cart with derived count and subtotal
//! - Order summary with a flat tax rate
//! - Pluggable authentication (local mock or hosted identity service)
//! - JSON HTTP surface for the storefront UI

use thiserror::Error;

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod domain;

pub use auth::{AuthError, AuthGateway, MockAuthGateway, RemoteAuthGateway, Session};
pub use catalog::{Catalog, CatalogError, Category, StaticCatalog};
pub use config::{Config, ConfigError};
pub use domain::aggregates::{CartLine, CartStore, OrderSummary, Product, ProductSnapshot};
pub use domain::filters::{apply_filters, FilterSpec, PriceRange, SortBy};
pub use domain::value_objects::{Price, Quantity, Rating};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
