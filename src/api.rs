//! JSON HTTP surface wiring shopper actions to the catalog, cart and auth gateway.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::auth::{AuthError, AuthGateway, FileSessionCache, MemorySessionCache, MockAuthGateway, Session, SessionCache};
use crate::catalog::{Catalog, Category, StaticCatalog};
use crate::config::Config;
use crate::domain::aggregates::{CartLine, CartStore, OrderSummary, Product};
use crate::domain::filters::{apply_filters, FilterSpec, PriceRange, SortBy};
use crate::domain::value_objects::Price;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub auth: Arc<dyn AuthGateway>,
    pub carts: Arc<Mutex<HashMap<String, CartStore>>>,
    pub tax_rate: Decimal,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>, auth: Arc<dyn AuthGateway>, tax_rate: Decimal) -> Self {
        Self { catalog, auth, carts: Arc::new(Mutex::new(HashMap::new())), tax_rate }
    }

    /// Catalog from `CATALOG_PATH` or the demo set; mock auth with the configured cache.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let catalog: Arc<dyn Catalog> = match &config.catalog_path {
            Some(path) => Arc::new(StaticCatalog::from_json_file(path)?),
            None => Arc::new(StaticCatalog::demo()),
        };
        let cache: Arc<dyn SessionCache> = match &config.session_cache_path {
            Some(path) => Arc::new(FileSessionCache::new(path)),
            None => Arc::new(MemorySessionCache::new()),
        };
        let auth = MockAuthGateway::new(cache).with_latency(config.auth_latency);
        Ok(Self::new(catalog, Arc::new(auth), config.tax_rate))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Auth(AuthError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Auth(AuthError::Rejected(_)) => StatusCode::UNAUTHORIZED,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/categories", get(list_categories))
        .route("/api/v1/sort-options", get(list_sort_options))
        .route("/api/v1/cart/:session", get(get_cart).post(add_to_cart).delete(clear_cart))
        .route("/api/v1/cart/:session/items/:id", put(update_quantity).delete(remove_from_cart))
        .route("/api/v1/cart/:session/summary", get(cart_summary))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Comma-separated category ids.
    pub categories: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<String>,
}

impl ProductQuery {
    pub fn to_spec(&self) -> FilterSpec {
        let categories = self.categories.as_deref().unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let bounds = PriceRange::unbounded();
        let range = PriceRange::new(
            self.min_price.unwrap_or(bounds.min),
            self.max_price.unwrap_or(bounds.max),
        );
        let sort = self.sort.as_deref().and_then(|s| s.parse::<SortBy>().ok()).unwrap_or_default();
        FilterSpec::default().with_categories(categories).with_price_range(range).with_sort(sort)
    }
}

async fn list_products(State(s): State<AppState>, Query(q): Query<ProductQuery>) -> Json<Vec<Product>> {
    let spec = q.to_spec();
    let products = apply_filters(&s.catalog.products(), &spec);
    debug!(sort = %spec.sort_by, categories = spec.categories.len(), visible = products.len(), "products filtered");
    Json(products)
}

async fn list_categories(State(s): State<AppState>) -> Json<Vec<Category>> { Json(s.catalog.categories()) }

#[derive(Debug, Serialize)]
pub struct SortOption { pub value: SortBy, pub label: &'static str }

async fn list_sort_options() -> Json<Vec<SortOption>> {
    Json(SortBy::ALL.iter().map(|s| SortOption { value: *s, label: s.label() }).collect())
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CartView {
    pub id: String,
    pub lines: Vec<CartLine>,
    pub cart_count: u64,
    pub subtotal: Price,
    pub updated_at: DateTime<Utc>,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            id: cart.id().to_string(),
            lines: cart.lines().to_vec(),
            cart_count: cart.cart_count(),
            subtotal: cart.subtotal(),
            updated_at: cart.updated_at(),
        }
    }
}

#[derive(Debug, Deserialize)] pub struct AddToCartRequest { pub product_id: String }
#[derive(Debug, Deserialize)] pub struct UpdateQuantityRequest { pub quantity: i64 }

/// Runs `f` against the session's cart (created on first use) and renders the result.
async fn with_cart<F>(s: &AppState, session: String, f: F) -> CartView
where
    F: FnOnce(&mut CartStore),
{
    let mut carts = s.carts.lock().await;
    let cart = carts.entry(session.clone()).or_default();
    f(cart);
    for event in cart.take_events() {
        debug!(session = %session, ?event, "cart event");
    }
    CartView::from(&*cart)
}

async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Json<CartView> {
    Json(with_cart(&s, session, |_| {}).await)
}

async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> Result<Json<CartView>, ApiError> {
    let product = s.catalog.find(&r.product_id).ok_or_else(|| ApiError::NotFound(format!("product {}", r.product_id)))?;
    Ok(Json(with_cart(&s, session, |cart| cart.add_to_cart(product.snapshot())).await))
}

async fn update_quantity(State(s): State<AppState>, Path((session, id)): Path<(String, String)>, Json(r): Json<UpdateQuantityRequest>) -> Json<CartView> {
    Json(with_cart(&s, session, |cart| cart.update_quantity(&id, r.quantity)).await)
}

async fn remove_from_cart(State(s): State<AppState>, Path((session, id)): Path<(String, String)>) -> Json<CartView> {
    Json(with_cart(&s, session, |cart| cart.remove_from_cart(&id)).await)
}

async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> Json<CartView> {
    Json(with_cart(&s, session, CartStore::clear_cart).await)
}

async fn cart_summary(State(s): State<AppState>, Path(session): Path<String>) -> Json<OrderSummary> {
    let carts = s.carts.lock().await;
    let summary = match carts.get(&session) {
        Some(cart) => OrderSummary::from_cart(cart, s.tax_rate),
        None => OrderSummary::from_cart(&CartStore::new(), s.tax_rate),
    };
    Json(summary)
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest { #[serde(default)] pub email: String, #[serde(default)] pub password: String }

#[derive(Debug, Deserialize)]
pub struct SignupRequest { #[serde(default)] pub name: String, #[serde(default)] pub email: String, #[serde(default)] pub password: String }

#[derive(Debug, Serialize)]
pub struct MeResponse { pub authenticated: bool, pub user: Option<Session> }

async fn login(State(s): State<AppState>, Json(r): Json<LoginRequest>) -> Result<Json<Session>, ApiError> {
    Ok(Json(s.auth.login(&r.email, &r.password).await?))
}

async fn signup(State(s): State<AppState>, Json(r): Json<SignupRequest>) -> Result<(StatusCode, Json<Session>), ApiError> {
    Ok((StatusCode::CREATED, Json(s.auth.signup(&r.name, &r.email, &r.password).await?)))
}

async fn logout(State(s): State<AppState>) -> StatusCode {
    s.auth.logout().await;
    StatusCode::NO_CONTENT
}

async fn me(State(s): State<AppState>) -> Json<MeResponse> {
    let user = s.auth.current_user().await;
    Json(MeResponse { authenticated: user.is_some(), user })
}
