//! Clinic Settlement Core - API Server Binary
//!
//! This binary starts the HTTP API server for the settlement engine.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin clinic-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 cargo run --bin clinic-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_FALLBACK_EXCHANGE_RATE` - Last-resort Bs/USD rate (default: 36.50)
//! * `API_RATE_STALENESS_SECS` - Cached-rate staleness window (default: 3600)

use std::sync::Arc;

use chrono::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::ExchangeRate;
use domain_settlement::LayeredRateProvider;
use interface_api::{config::ApiConfig, create_router, store::MemoryStore, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, builds the rate-provider
/// ladder and the in-memory store, and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The configured fallback rate is not positive
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fallback_rate = ExchangeRate::new(config.fallback_exchange_rate)?;
    let rates = LayeredRateProvider::new(Duration::seconds(config.rate_staleness_secs))
        .with_fallback(fallback_rate);

    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        rates: Arc::new(rates),
        config: config.clone(),
    };

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "clinic settlement API listening");

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
