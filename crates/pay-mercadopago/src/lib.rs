//! # pay-mercadopago
//!
//! Mercado Pago Checkout Pro strategy for the Blee checkout service.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_mercadopago::MercadoPagoStrategy;
//! use pay_core::{PaymentStrategy, PreferenceBuilder};
//!
//! // Create strategy from environment (MP_ACCESS_TOKEN)
//! let strategy = MercadoPagoStrategy::from_env()?;
//!
//! let preference = PreferenceBuilder::default().build(&cart)?;
//! let result = strategy.create_preference(&preference).await?;
//!
//! // Redirect the buyer to result.init_point (or sandbox_init_point in test mode)
//! ```

pub mod config;
pub mod preference;

// Re-exports
pub use config::MercadoPagoConfig;
pub use preference::MercadoPagoStrategy;
