//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - GET  / - Health check
/// - POST /criar-pagamento - Create a Mercado Pago preference from a cart
pub fn create_router(state: AppState) -> Router {
    // Storefronts are served from several hosts
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/criar-pagamento", post(handlers::create_payment))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
