//! # pay-api
//!
//! HTTP API layer for the Blee checkout service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The cart to Mercado Pago preference endpoint
//! - Health checks
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/` | Health check |
//! | POST | `/criar-pagamento` | Create checkout preference |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{load_checkout_policy, AppConfig, AppState};
