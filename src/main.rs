//! OpenSASE Storefront - catalog, cart and auth over JSON

use anyhow::Result;
use opensase_storefront::{api::{self, AppState}, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;

    let addr = config.socket_addr();
    tracing::info!(%addr, tax_rate = %config.tax_rate, "OpenSASE Storefront listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, api::router(state)).await?;
    Ok(())
}
