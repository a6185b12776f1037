//! Catalog filtering and sorting.
//!
//! [`apply_filters`] is a pure function over a borrowed product slice: it
//! filters by category and inclusive price range, then sorts with a stable
//! sort so products with equal keys keep their catalog order.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Product;
use crate::domain::value_objects::Price;

/// Upper bound of the price slider in the storefront sidebar.
pub const SIDEBAR_PRICE_MAX: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Inclusive price bounds, kept as given. `min > max` is allowed and matches
/// nothing, as does a range lying entirely below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Self { Self { min, max } }

    pub fn unbounded() -> Self { Self { min: Decimal::ZERO, max: Decimal::MAX } }

    pub fn contains(&self, price: Price) -> bool { self.min <= price.amount() && price.amount() <= self.max }
}

impl Default for PriceRange {
    fn default() -> Self { Self::unbounded() }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Rating,
    /// Products carry no timestamp, so this keeps catalog order.
    Newest,
}

impl SortBy {
    pub const ALL: [SortBy; 5] = [SortBy::Featured, SortBy::PriceAsc, SortBy::PriceDesc, SortBy::Newest, SortBy::Rating];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::Rating => "Highest Rated",
            Self::Newest => "Newest Arrivals",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Unknown names fall back to `Featured`, i.e. no reordering.
impl FromStr for SortBy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::ALL.into_iter().find(|sort| sort.as_str() == s.trim()).unwrap_or_default())
    }
}

/// The complete set of shopper-selected criteria. Replaced wholesale on change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Empty means every category.
    pub categories: BTreeSet<String>,
    pub price_range: PriceRange,
    pub sort_by: SortBy,
}

impl FilterSpec {
    /// The sidebar's reset state: all categories, `$0` to `$1000`, featured.
    pub fn storefront_default() -> Self {
        Self { categories: BTreeSet::new(), price_range: PriceRange::new(Decimal::ZERO, SIDEBAR_PRICE_MAX), sort_by: SortBy::Featured }
    }

    #[must_use]
    pub fn with_categories<I, S>(self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { categories: categories.into_iter().map(Into::into).collect(), ..self }
    }

    #[must_use]
    pub fn with_price_range(self, price_range: PriceRange) -> Self { Self { price_range, ..self } }

    #[must_use]
    pub fn with_sort(self, sort_by: SortBy) -> Self { Self { sort_by, ..self } }

    pub fn matches(&self, product: &Product) -> bool {
        (self.categories.is_empty() || self.categories.contains(&product.category))
            && self.price_range.contains(product.price)
    }
}

/// Returns the visible products for `spec` without touching `products`.
pub fn apply_filters(products: &[Product], spec: &FilterSpec) -> Vec<Product> {
    let mut visible: Vec<Product> = products.iter().filter(|p| spec.matches(p)).cloned().collect();

    match spec.sort_by {
        SortBy::PriceAsc => visible.sort_by(|a, b| a.price.cmp(&b.price)),
        SortBy::PriceDesc => visible.sort_by(|a, b| b.price.cmp(&a.price)),
        SortBy::Rating => visible.sort_by(|a, b| b.rating.value().total_cmp(&a.rating.value())),
        SortBy::Newest | SortBy::Featured => {}
    }

    visible
}
