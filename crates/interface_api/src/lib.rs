//! HTTP API Layer
//!
//! This crate provides the REST surface over the settlement engine using
//! Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for settlement and health
//! - **DTOs**: Request/Response data transfer objects
//! - **Store**: The transactional-store port with an in-memory adapter
//! - **Error Handling**: Consistent error responses mapped from the domain
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_settlement::RateProvider;

use crate::config::ApiConfig;
use crate::handlers::{health, settlement};
use crate::store::SettlementStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SettlementStore>,
    pub rates: Arc<dyn RateProvider>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no versioned prefix)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Settlement routes
    let api_routes = Router::new()
        .route("/invoices/:id/payments", post(settlement::apply_payment))
        .route("/payments/:id/cancel", post(settlement::cancel_payment))
        .route("/patients/:id/debt-summary", get(settlement::debt_summary));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
